//! # Declaration Files End to End
//!
//! Loads declaration and document files from disk through the CLI library
//! and checks the same reports the builder API produces.

use std::fs;
use std::path::PathBuf;

use jshape_cli::check::{check_document, CheckOutcome};
use jshape_cli::show::definitions;
use jshape_cli::{load_declarations, read_document};
use jshape_report::RenderOptions;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const CHECKOUT_DECL: &str = r#"
item:
  object: { name: string, count: numeric, price: numeric }
  reject: [ discount ]
items:
  array: item
checkout:
  object:
    items: items
    change: number?
    type: { enum: [ { literal: 1 }, atom ] }
    customer:
      optional:
        object:
          name: string
          id: string
          birthday: string
          gender: { enum: [ { literal: man }, { literal: woman }, { literal: other } ] }
          phone: string
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn yaml_declarations_check_json_document() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write(&dir, "types.yaml", CHECKOUT_DECL);
    let input = write(
        &dir,
        "order.json",
        r#"{"items": [{"name": "test", "count": 1, "price": [], "comment": "x"}], "type": 1}"#,
    );

    let ns = load_declarations(&decl).unwrap();
    let document = read_document(&input).unwrap();
    let outcome = check_document(&ns, "checkout", &document, &RenderOptions::default()).unwrap();

    let CheckOutcome::Invalid(report) = outcome else {
        panic!("expected a failure");
    };
    let expected = r#"TypeError at $.items[0].price: expected=numeric, value=[]

 "price" expected to be numeric
  0 expected to be item
   "items" expected to be items
    $ expected to be checkout

Where:
  item = { "name": string, "count": numeric, "price": numeric }
  items = array(item)
  checkout = {
    "items": items,
    "change": optional(number),
    "type": enum(1, atom),
    "customer": optional(
      {
        "name": string,
        "id": string,
        "birthday": string,
        "gender": enum("man", "woman", "other"),
        "phone": string
      }
    )
  }"#;
    assert_eq!(report, expected);
}

#[test]
fn yaml_document_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write(&dir, "types.yaml", CHECKOUT_DECL);
    let input = write(
        &dir,
        "order.yml",
        "items:\n  - { name: pen, count: 2, price: '1.50', note: gift }\ntype: express\n",
    );

    let ns = load_declarations(&decl).unwrap();
    let document = read_document(&input).unwrap();
    let outcome = check_document(&ns, "checkout", &document, &RenderOptions::default()).unwrap();

    let CheckOutcome::Valid(value) = outcome else {
        panic!("expected success");
    };
    assert_eq!(
        serde_json::to_value(&value).unwrap(),
        serde_json::json!({
            "change": null,
            "customer": null,
            "items": [{"count": 2, "name": "pen", "price": "1.50"}],
            "type": "express"
        })
    );
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"items":[{"name":"pen","count":2,"price":"1.50"}],"change":null,"type":"express","customer":null}"#
    );
}

#[test]
fn show_wraps_at_configured_width() {
    let dir = tempfile::tempdir().unwrap();
    let decl = write(&dir, "types.yaml", CHECKOUT_DECL);
    let ns = load_declarations(&decl).unwrap();

    let narrow = RenderOptions {
        width: 30,
        ..RenderOptions::default()
    };
    let entries = definitions(&ns, Some("item"), &narrow).unwrap();
    assert_eq!(
        entries,
        ["item = {\n  \"name\": string,\n  \"count\": numeric,\n  \"price\": numeric\n}"]
    );

    let all = definitions(&ns, None, &RenderOptions::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[1], "items = array(item)");
}
