//! Table operations: get, set, delete, len and key iteration

mod common;

use anyhow::Result;
use common::*;

#[test]
fn test_set_and_get() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("secondary")?;

    table.set("really", "phreooooow!")?;
    assert_eq!(table.get("really")?, "phreooooow!");
    assert!(table.contains_key("really")?);
    assert!(!table.contains_key("not_there")?);

    Ok(())
}

#[test]
fn test_get_missing_key() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    let err = table.get("missing").unwrap_err();
    assert!(err.is_not_found());
    match err {
        Error::KeyNotFound { table, key } => {
            assert_eq!(table, "things");
            assert_eq!(key, "missing");
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }

    Ok(())
}

#[test]
fn test_set_replaces() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    table.set("k", "v1")?;
    assert_eq!(table.len()?, 1);
    table.set("k", "v2")?;
    assert_eq!(table.len()?, 1);
    assert_eq!(table.get("k")?, "v2");

    Ok(())
}

#[test]
fn test_delete() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    table.set("a", "1")?;
    table.set("b", "2")?;
    table.delete("a")?;

    assert!(table.get("a").unwrap_err().is_not_found());
    assert_eq!(table.get("b")?, "2");
    assert_eq!(table.len()?, 1);

    // deleting again reports the missing key and changes nothing
    assert!(matches!(table.delete("a"), Err(Error::KeyNotFound { .. })));
    assert_eq!(table.len()?, 1);

    Ok(())
}

#[test]
fn test_len_and_is_empty() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;
    assert!(table.is_empty()?);

    for i in 0..10 {
        table.set(i, format!("value {}", i))?;
    }
    assert_eq!(table.len()?, 10);
    assert!(!table.is_empty()?);

    // a second handle sees the same rows
    assert_eq!(store.table("things")?.len()?, 10);

    Ok(())
}

#[test]
fn test_integer_keyed_words() -> Result<()> {
    let store = Store::open_in_memory()?;
    let words = store.create_table("words", TableOptions::new().key_type(TypeTag::Integer))?;

    for (n, word) in ["the", "quick", "fox"].into_iter().enumerate() {
        words.set(n as i64, word)?;
    }

    let mut list = words.list()?;
    list.sort_by_key(|k| k.as_i64());
    assert_eq!(list, vec![SqlValue::Integer(0), SqlValue::Integer(1), SqlValue::Integer(2)]);
    assert_eq!(words.get(1)?, "quick");

    Ok(())
}

#[test]
fn test_counter_with_integer_values() -> Result<()> {
    let store = Store::open_in_memory()?;
    let index = store.create_table("counter_index", TableOptions::new().value_type(TypeTag::Integer))?;

    let n = match index.get("count") {
        Ok(count) => count.as_i64().unwrap_or(0),
        Err(err) if err.is_not_found() => 0,
        Err(err) => return Err(err.into()),
    };
    index.set("count", n + 42)?;

    // INTEGER affinity turns numeric text into an integer
    index.set("text_count", "7")?;
    assert_eq!(index.get("count")?, SqlValue::Integer(42));
    assert_eq!(index.get("text_count")?, SqlValue::Integer(7));

    Ok(())
}

#[test]
fn test_keys_in_insertion_order() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    for name in ["charlie", "alpha", "bravo"] {
        table.set(name, "x")?;
    }

    let keys = keys(table.keys())?;
    assert_eq!(keys, vec![SqlValue::from("charlie"), SqlValue::from("alpha"), SqlValue::from("bravo")]);

    Ok(())
}

#[test]
fn test_keys_across_pages() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.create_table("many", TableOptions::new().key_type(TypeTag::Integer))?;

    let total = sqlarray::CURSOR_BATCH_SIZE * 2 + 17;
    for i in 0..total {
        table.set(i as i64, "v")?;
    }

    let keys = table.list()?;
    assert_eq!(keys.len(), total);
    assert!(keys.iter().enumerate().all(|(i, k)| *k == SqlValue::Integer(i as i64)));

    Ok(())
}

#[test]
fn test_rewriting_every_key_while_iterating() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    let total = sqlarray::CURSOR_BATCH_SIZE + 44;
    for i in 0..total {
        table.set(format!("key{}", i), "old")?;
    }

    // each rewrite moves the row to a new rowid past the end of the scan
    let mut visited = 0;
    for key in table.keys() {
        table.set(key?, "new")?;
        visited += 1;
        assert!(visited <= total, "visited {} keys in a {} row table", visited, total);
    }
    assert_eq!(visited, total);
    assert_eq!(table.len()?, total);
    assert_eq!(keys(table.equal("new"))?.len(), total);
    assert!(keys(table.equal("old"))?.is_empty());

    Ok(())
}

#[test]
fn test_cursor_is_single_pass() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;
    table.set("only", "one")?;

    let mut cursor = table.keys();
    assert_eq!(cursor.next().transpose()?, Some(SqlValue::from("only")));
    assert!(cursor.next().is_none());
    assert!(cursor.next().is_none());

    // a fresh cursor starts again
    assert_eq!(table.list()?.len(), 1);

    Ok(())
}

#[test]
fn test_mixed_key_types() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("mixed")?;

    table.set(1, "int")?;
    table.set(1.5, "real")?;
    table.set("1", "text")?;
    table.set(vec![1u8], "blob")?;

    assert_eq!(table.len()?, 4);
    assert_eq!(table.get(1)?, "int");
    assert_eq!(table.get(1.5)?, "real");
    assert_eq!(table.get("1")?, "text");
    assert_eq!(table.get(vec![1u8])?, "blob");

    Ok(())
}

#[test]
fn test_null_and_nan_keys_rejected() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("things")?;

    assert!(matches!(table.set(SqlValue::Null, "x"), Err(Error::InvalidKey(SqlValue::Null))));
    assert!(matches!(table.set(None::<&str>, "y"), Err(Error::InvalidKey(SqlValue::Null))));
    assert!(matches!(table.set(f64::NAN, "z"), Err(Error::InvalidKey(SqlValue::Real(_)))));
    assert_eq!(table.len()?, 0);

    assert!(matches!(table.get(SqlValue::Null), Err(Error::InvalidKey(_))));
    assert!(matches!(table.get_raw(f64::NAN), Err(Error::InvalidKey(_))));
    assert!(matches!(table.contains_key(SqlValue::Null), Err(Error::InvalidKey(_))));
    assert!(matches!(table.delete(f64::NAN), Err(Error::InvalidKey(_))));

    // infinities and zero are ordinary real keys
    table.set(f64::INFINITY, "inf")?;
    table.set(0.0, "zero")?;
    assert_eq!(table.get(f64::INFINITY)?, "inf");
    assert_eq!(table.get(0.0)?, "zero");
    assert_eq!(table.len()?, 2);

    Ok(())
}

#[test]
fn test_invalid_table_names() -> Result<()> {
    let store = Store::open_in_memory()?;

    for name in [r#"Robert"); DROP TABLE *"#, "", "table1", "has space", "semi;colon"] {
        match store.table(name) {
            Err(Error::InvalidName(rejected)) => assert_eq!(rejected, name),
            other => panic!("expected InvalidName for {:?}, got {:?}", name, other),
        }
    }

    // nothing was created
    assert!(store.table_names()?.is_empty());

    Ok(())
}

#[test]
fn test_table_formatting() -> Result<()> {
    let store = Store::open_in_memory()?;
    let table = store.table("another")?;

    assert_eq!(table.to_string(), "another");
    assert_eq!(format!("{:?}", table), "Store(':memory:')['another']");
    assert_eq!(store.to_string(), "Store(':memory:')");

    Ok(())
}
