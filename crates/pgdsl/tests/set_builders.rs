use pgdsl::prelude::*;

struct Users {
    table: Table,
    id: Field<i64>,
    name: Field<String>,
    age: Field<i32>,
}

fn users() -> Users {
    let table = Table::new("users").unwrap();
    Users {
        id: table.field("id"),
        name: table.field("name"),
        age: table.field("age"),
        table,
    }
}

fn rendered(q: &impl SqlQb) -> (String, String) {
    let built = q.build();
    let params = format!("{:?}", built.params.iter().collect::<Vec<_>>());
    (built.sql, params)
}

#[test]
fn insert_block_equals_chained_set() {
    let u = users();
    let seed = insert_into(&u.table);

    let chained = seed.clone().set(&u.age, 1).set(&u.id, 2i64);
    let block = seed.values(|row| {
        row.to(&u.age, 1);
        row.to(&u.id, 2i64)
    });

    assert_eq!(rendered(&block), rendered(&chained));
    assert_eq!(block.to_sql(), "INSERT INTO users (age, id) VALUES ($1, $2)");
}

#[test]
fn each_assignment_extends_the_previous_step() {
    let u = users();
    let stmt = insert_into(&u.table).values(|row| {
        let first = row.to(&u.name, "alice");
        assert_eq!(first.assignment_count(), 1);
        let second = row.to(&u.age, 30);
        assert_eq!(second.assignment_count(), 2);
        second
    });
    assert_eq!(stmt.assignment_count(), 2);
}

#[test]
fn update_block_returning_another_step_is_not_modified() {
    let u = users();
    let other = update(&u.table).set(&u.name, "fixed");
    let expected = rendered(&other);

    let stmt = update(&u.table).set_with(|_| other);
    assert_eq!(rendered(&stmt), expected);
    assert_eq!(stmt.assignment_count(), 1);
}

#[test]
fn block_result_is_returned_verbatim() {
    let u = users();
    let stmt = update(&u.table).set_with(|s| {
        let first = s.to(&u.name, "a");
        s.to(&u.age, 3);
        first
    });
    assert_eq!(stmt.to_sql(), "UPDATE users SET name = $1");
}

#[test]
fn multi_row_insert() {
    let u = users();
    let stmt = insert_into(&u.table)
        .values(|row| {
            row.to(&u.name, "alice");
            row.to(&u.age, 30)
        })
        .values(|row| {
            row.to(&u.name, "bob");
            row.to(&u.age, 41)
        })
        .returning(&[u.id.erase()]);

    let built = stmt.build_checked().unwrap();
    assert_eq!(
        built.sql,
        "INSERT INTO users (name, age) VALUES ($1, $2), ($3, $4) RETURNING users.id"
    );
    assert_eq!(
        format!("{:?}", built.params.iter().collect::<Vec<_>>()),
        r#"["alice", 30, "bob", 41]"#
    );
}

#[test]
fn mismatched_rows_fail_validation() {
    let u = users();
    let stmt = insert_into(&u.table)
        .values(|row| row.to(&u.name, "alice"))
        .values(|row| row.to(&u.age, 41));
    let err = stmt.validate().unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, DslError::Validation(_)));
}

#[test]
fn update_block_with_where_and_returning() {
    let u = users();
    let built = update(&u.table)
        .set_with(|s| {
            s.to(&u.name, "carol");
            s.to(&u.age, 52)
        })
        .where_(u.id.eq(7i64))
        .returning(&[u.id.erase(), u.age.erase()])
        .build();
    assert_eq!(
        built.sql,
        "UPDATE users SET name = $1, age = $2 WHERE users.id = $3 RETURNING users.id, users.age"
    );
    assert_eq!(built.params.len(), 3);
}

#[test]
fn upsert_block() {
    let u = users();
    let stmt = insert_into(&u.table)
        .values(|row| {
            row.to(&u.id, 1i64);
            row.to(&u.name, "alice")
        })
        .on_conflict(&[u.id.erase()])
        .do_update()
        .set_with(|s| {
            s.to_field(&u.name, excluded(&u.name));
            s.to(&u.age, 0)
        })
        .where_(u.age.lt(100));
    assert_eq!(
        stmt.to_sql(),
        "INSERT INTO users (id, name) VALUES ($1, $2) ON CONFLICT (id) \
         DO UPDATE SET name = EXCLUDED.name, age = $3 WHERE users.age < $4"
    );
}

#[test]
fn set_block_matches_json_assignment() {
    let t = Table::new("events").unwrap();
    let payload = t.field::<serde_json::Value>("payload");
    let value = serde_json::json!({ "kind": "signup" });

    let chained = insert_into(&t).set_json(&payload, &value).unwrap();
    let block = insert_into(&t).values(|row| row.to(&payload, value.clone()));
    assert_eq!(chained.to_sql(), block.to_sql());
    assert_eq!(block.build().params.len(), 1);
}

#[test]
fn upsert_block_continues_existing_assignments() {
    let t = Table::new("counters").unwrap();
    let k = t.field::<String>("k");
    let v = t.field::<i32>("v");
    let w = t.field::<i32>("w");

    let seeded = insert_into(&t)
        .set(&k, "hits")
        .on_conflict(&[k.erase()])
        .do_update()
        .set(&v, 1);
    let chained = seeded.clone().set(&w, 2);
    let block = seeded.set_with(|s| s.to(&w, 2));

    assert_eq!(rendered(&block), rendered(&chained));
    assert_eq!(
        block.to_sql(),
        "INSERT INTO counters (k) VALUES ($1) ON CONFLICT (k) DO UPDATE SET v = $2, w = $3"
    );
    assert_eq!(block.assignment_count(), 2);
}
