//! Building, typing into, and collecting schema-driven forms

use madang_core::{parse_datetime, ColumnDescriptor, Record, Value};
use madang_forms::{FieldKind, FormBuilder, FormError, ValidationError, ValidationReason};
use pretty_assertions::assert_eq;

fn builder() -> FormBuilder {
    FormBuilder::new().with_default_date(parse_datetime("2024-07-01 09:00:00").unwrap())
}

fn book_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("bookid", "INTEGER").primary_key(),
        ColumnDescriptor::new("bookname", "VARCHAR(40)"),
        ColumnDescriptor::new("publisher", "VARCHAR(40)"),
        ColumnDescriptor::new("price", "INTEGER"),
    ]
}

fn existing_book() -> Record {
    Record::new()
        .with("bookid", 1)
        .with("bookname", "A")
        .with("publisher", "P")
        .with("price", 1000)
}

#[test]
fn widget_follows_each_declared_type() {
    let columns = vec![
        ColumnDescriptor::new("qty", "int"),
        ColumnDescriptor::new("price", "decimal(10,2)"),
        ColumnDescriptor::new("ratio", "float"),
        ColumnDescriptor::new("active", "bit"),
        ColumnDescriptor::new("created", "datetime"),
        ColumnDescriptor::new("note", "nvarchar(50)"),
        ColumnDescriptor::new("blob", "geography"),
    ];
    let form = builder().build_fields(&columns, None, "");

    let kinds: Vec<_> = form.fields().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FieldKind::Numeric,
            FieldKind::Numeric,
            FieldKind::Numeric,
            FieldKind::Checkbox,
            FieldKind::DatePicker,
            FieldKind::Text,
            FieldKind::Text,
        ]
    );
    assert!(form.id_field().is_none());
}

#[test]
fn unmodified_fields_round_trip() {
    let columns = vec![
        ColumnDescriptor::new("qty", "int"),
        ColumnDescriptor::new("price", "decimal(10,2)"),
        ColumnDescriptor::new("active", "bit"),
        ColumnDescriptor::new("created", "datetime"),
        ColumnDescriptor::new("note", "text"),
    ];
    let created = parse_datetime("2020-02-29 13:45:00").unwrap();
    let existing = Record::new()
        .with("qty", Value::from("123"))
        .with("price", 19.99)
        .with("active", true)
        .with("created", created)
        .with("note", "hello");

    let form = builder().build_fields(&columns, Some(&existing), "");

    assert_eq!(form.field("qty").and_then(|f| f.text()), Some("123"));
    let collected = form.collect().unwrap();
    assert_eq!(collected.get("qty"), Some(&Value::Int64(123)));
    assert_eq!(collected.get("price"), Some(&Value::Float64(19.99)));
    assert_eq!(collected.get("active"), Some(&Value::Bool(true)));
    assert_eq!(collected.get("created"), Some(&Value::DateTime(created)));
    assert_eq!(collected.get("note"), Some(&Value::from("hello")));

    // Displaying the collected integer again gives the same text
    let again = builder().build_fields(&columns, Some(&collected), "");
    assert_eq!(again.field("qty").and_then(|f| f.text()), Some("123"));
}

#[test]
fn edit_form_marks_id_read_only_and_collects_unchanged_record() {
    let existing = existing_book();
    let form = builder().build_fields(&book_columns(), Some(&existing), "bookid");

    let id = form.field("bookid").unwrap();
    assert!(id.is_read_only());
    assert_eq!(id.text(), Some("1"));
    assert!(!form.field("bookname").unwrap().is_read_only());

    assert_eq!(form.collect().unwrap(), existing);
}

#[test]
fn blank_required_text_blocks_collect() {
    let existing = Record::new()
        .with("bookid", 5)
        .with("bookname", "")
        .with("publisher", "Q")
        .with("price", 10);
    let form = builder().build_fields(&book_columns(), Some(&existing), "bookid");

    assert_eq!(
        form.collect(),
        Err(ValidationError::new("bookname", ValidationReason::Required))
    );
}

#[test]
fn first_invalid_field_is_reported() {
    let mut form = builder().build_insert_fields(&book_columns(), "bookid", 1);
    form.field_mut("price").unwrap().set_text("1.5");

    let err = form.collect().unwrap_err();
    assert_eq!(err.field, "bookname");

    form.type_str("bookname", "Rust").unwrap();
    form.type_str("publisher", "Madang").unwrap();
    let err = form.collect().unwrap_err();
    assert_eq!(err, ValidationError::new("price", ValidationReason::InvalidNumber));
    assert_eq!(err.to_string(), "price: not a valid number");
}

#[test]
fn insert_form_prefills_next_id() {
    let mut form = builder().build_insert_fields(&book_columns(), "BookID", 11);

    let id = form.id_field().unwrap();
    assert_eq!(id.column(), "bookid");
    assert_eq!(id.text(), Some("11"));
    assert_eq!(form.type_str("bookid", "9"), Err(FormError::ReadOnly("bookid".into())));

    form.type_str("bookname", "Olympic Champions").unwrap();
    form.type_str("publisher", "Pearson").unwrap();
    form.type_str("price", "13000").unwrap();

    assert_eq!(
        form.collect().unwrap(),
        Record::new()
            .with("bookid", 11)
            .with("bookname", "Olympic Champions")
            .with("publisher", "Pearson")
            .with("price", 13000)
    );
}

#[test]
fn typing_a_second_separator_is_refused() {
    let columns = vec![ColumnDescriptor::new("saleprice", "DECIMAL(10,2)")];
    let mut form = builder().build_fields(&columns, None, "");

    let accepted = form.type_str("saleprice", "1.2.3").unwrap();

    assert_eq!(accepted, 4);
    let text = form.field("saleprice").unwrap().text().unwrap();
    assert_eq!(text.matches('.').count(), 1);
    assert_eq!(form.collect().unwrap().get("saleprice"), Some(&Value::Float64(1.23)));
}

#[test]
fn orders_form_defaults_date_to_now() {
    let columns = vec![
        ColumnDescriptor::new("orderid", "INTEGER").primary_key(),
        ColumnDescriptor::new("custid", "INTEGER"),
        ColumnDescriptor::new("bookid", "INTEGER"),
        ColumnDescriptor::new("saleprice", "INTEGER"),
        ColumnDescriptor::new("orderdate", "DATE"),
    ];
    let before = chrono::Local::now().naive_local();
    let mut form = FormBuilder::new().build_insert_fields(&columns, "orderid", 1);
    let after = chrono::Local::now().naive_local();

    let date = form.field("orderdate").unwrap().date().unwrap();
    assert!(before <= date && date <= after);
    assert_eq!(form.type_str("orderdate", "x"), Err(FormError::NotTextual("orderdate".into())));
}

#[test]
fn unknown_fields_are_reported() {
    let mut form = builder().build_fields(&book_columns(), None, "bookid");
    assert_eq!(
        form.type_str("isbn", "123"),
        Err(FormError::UnknownField("isbn".into()))
    );
}

#[test]
fn blank_id_collects_to_null() {
    let columns = vec![
        ColumnDescriptor::new("code", "TEXT").primary_key(),
        ColumnDescriptor::new("label", "TEXT"),
    ];
    let mut form = builder().build_fields(&columns, None, "code");
    form.type_str("label", "x").unwrap();

    assert_eq!(form.collect().unwrap().get("code"), Some(&Value::Null));
}
