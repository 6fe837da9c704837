use schemagen_core::AxisKind;
use schemagen_generate::{FieldAxis, TableAxis};

fn print_group<A: AxisKind>() {
    println!("[{}]", A::GROUP);
    for axis in A::ALL {
        println!("{} = {:?}", axis.name(), axis.defaults());
    }
}

fn main() {
    print_group::<TableAxis>();
    print_group::<FieldAxis>();
}
