use std::collections::HashSet;

use serde_json::json;

use schemagen_core::{Dialect, GenerationConfig, GenerationError, KeyTypePolicy, VariableSpace};
use schemagen_generate::{
    AGG_TYPE_PLACEHOLDER, FieldAxis, GenerateOptions, GenerationEngine, assemble_ddl,
};

fn options(dialect: Dialect) -> GenerateOptions {
    GenerateOptions {
        dialect,
        key_type_policy: KeyTypePolicy::First,
    }
}

#[test]
fn field_combinations_are_named_uniquely() {
    let group = json!({
        "types": ["bigint(2)", "float", "double", "enum"],
        "sign": ["signed", "unsigned"],
        "keys": ["undef", "key"],
        "null": ["not null", "null"],
    });
    let space = VariableSpace::<FieldAxis>::load(group.as_object()).expect("load fields");
    let fields = GenerationEngine::new(options(Dialect::Mysql))
        .fields(&space)
        .into_result()
        .expect("generate fields");

    assert_eq!(fields.len(), 32);
    let names: HashSet<&str> = fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names.len(), 32);

    assert_eq!(fields[0].name, "field_bigint(2)_signed_undef_not null");
    assert_eq!(
        fields[0].definition,
        "`field_bigint(2)_signed_undef_not null` bigint(2) signed not null"
    );
    assert!(!fields[0].indexed);
    assert!(fields[2].indexed);

    let enum_field = fields
        .iter()
        .find(|field| field.base_type == "enum")
        .expect("enum field");
    assert!(
        enum_field
            .definition
            .ends_with("` enum('a','b','c','d','e') not null")
    );
}

#[test]
fn distributed_fields_carry_agg_placeholder() {
    let group = json!({"types": ["int"], "null": ["null"]});
    let space = VariableSpace::<FieldAxis>::load(group.as_object()).expect("load fields");
    let fields = GenerationEngine::new(options(Dialect::Doris))
        .fields(&space)
        .into_result()
        .expect("generate fields");

    assert_eq!(
        fields[0].definition,
        format!("`field_int_undef_undef_null` int {AGG_TYPE_PLACEHOLDER} null")
    );
}

#[test]
fn invalid_field_value_stops_the_group() {
    let group = json!({"types": ["int"], "null": ["null", "sometimes"]});
    let space = VariableSpace::<FieldAxis>::load(group.as_object()).expect("load fields");
    let output = GenerationEngine::new(options(Dialect::Mysql)).fields(&space);

    assert_eq!(output.statements.len(), 1);
    assert!(matches!(
        output.error,
        Some(GenerationError::Format { axis: "null", .. })
    ));
}

#[test]
fn aggregate_tables_replace_placeholder_on_value_columns() {
    let config = GenerationConfig::from_value(json!({
        "dialect": "doris",
        "tables": {
            "rows": [10],
            "partitions": ["RANGE(pk) (PARTITION p0 VALUES LESS THAN (100))"],
            "keys": ["AGGREGATE KEY", "DUPLICATE KEY"],
        },
        "fields": {"types": ["int", "varchar(10)"], "keys": ["key"]},
    }))
    .expect("config");

    let engine = GenerationEngine::new(GenerateOptions::from_config(&config));
    let run = engine.run(&config).expect("run");
    assert!(run.first_error().is_none());

    let ddl: Vec<&str> = run.ddl().collect();
    assert_eq!(ddl.len(), 2);
    assert!(ddl.iter().all(|stmt| !stmt.contains(AGG_TYPE_PLACEHOLDER)));
    assert!(ddl.iter().all(|stmt| !stmt.contains("%s")));
    assert!(ddl.iter().all(|stmt| !stmt.contains("key (`")));

    assert!(ddl[0].contains("AGGREGATE KEY(pk, pk)"));
    assert!(ddl[0].contains("`pk` int,\n`field_int_undef_key_undef` int REPLACE,\n"));
    assert!(ddl[1].contains("DUPLICATE KEY(pk, pk)"));
    assert!(ddl[1].contains("`field_int_undef_key_undef` int,\n"));
    assert!(!ddl[1].contains("REPLACE"));
}

#[test]
fn standard_tables_get_primary_key_and_indexes() {
    let config = GenerationConfig::from_value(json!({
        "dialect": "mysql",
        "tables": {"rows": [1], "charsets": ["utf8mb4"]},
        "fields": {"types": ["int"], "keys": ["undef", "key"]},
    }))
    .expect("config");

    let run = GenerationEngine::new(GenerateOptions::from_config(&config))
        .run(&config)
        .expect("run");
    let ddl: Vec<&str> = run.ddl().collect();

    assert_eq!(
        ddl,
        vec![
            "create table table_1_utf8mb4_partitions2_keys3 (\n\
             `pk` int primary key,\n\
             `field_int_undef_undef_undef` int,\n\
             `field_int_undef_key_undef` int,\n\
             key (`field_int_undef_key_undef`)\n\
             ) character set utf8mb4"
        ]
    );
}

#[test]
fn partial_tables_are_still_assembled() {
    let config = GenerationConfig::from_value(json!({
        "tables": {"rows": [1, "x"]},
        "fields": {"types": ["date"]},
    }))
    .expect("config");

    let run = GenerationEngine::new(GenerateOptions::from_config(&config))
        .run(&config)
        .expect("run");
    assert!(matches!(run.first_error(), Some(GenerationError::Format { .. })));
    assert_eq!(run.ddl().count(), 1);
    assert_eq!(run.tables.combinations, 2);
}

#[test]
fn malformed_group_fails_before_generation() {
    let config = GenerationConfig::from_value(json!({"fields": {"types": [["int"]]}}))
        .expect("config");
    let err = GenerationEngine::new(GenerateOptions::default())
        .run(&config)
        .unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(_)));
}

#[test]
fn assemble_can_be_rerun_with_other_fields() {
    let engine = GenerationEngine::new(options(Dialect::Sqlite3));
    let tables_space = VariableSpace::load(json!({"rows": [3]}).as_object()).expect("tables");
    let mut tables = engine.tables(&tables_space).into_result().expect("tables");

    assemble_ddl(&mut tables, &[], Dialect::Sqlite3);
    assert_eq!(
        tables[0].ddl(),
        Some("create table table_3_undef_partitions2_keys3 (\n`pk` int primary key\n)")
    );
    assert_eq!(tables[0].format, "create table table_3_undef_partitions2_keys3 (\n%s\n)");
}
