use super::*;
use pgdsl_query::{
    Condition, Field, Record1, RecordSet, SqlQb, Table, any, field, no_condition, plain_sql, select,
};

fn params(q: &impl SqlQb) -> String {
    format!("{:?}", q.build().params.iter().collect::<Vec<_>>())
}

#[test]
fn progression_normalises_last() {
    let p = (1..=10).step(2);
    assert_eq!(p.last(), Some(9));
    assert_eq!(p.iter().collect::<Vec<i32>>(), vec![1, 3, 5, 7, 9]);

    let p = down_to(10i64, 1).step(3);
    assert_eq!(p.step_size(), -3);
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![10, 7, 4, 1]);
}

#[test]
fn progression_empty_when_running_backwards() {
    assert!(Progression::from(5..=1).is_empty());
    assert!(down_to(1, 5).is_empty());
    assert!(Progression::from(3..3).is_empty());
    assert_eq!(Progression::from(5..=1).first(), None);
}

#[test]
fn exclusive_range_drops_end() {
    let p = Progression::from(1..4);
    assert_eq!(p.iter().collect::<Vec<i32>>(), vec![1, 2, 3]);
    assert!(Progression::from(0..i32::MIN).is_empty());
}

#[test]
#[should_panic(expected = "step must be positive")]
fn step_must_be_positive() {
    let _ = (1..=10).step(0);
}

#[test]
fn unit_step_range_is_between() {
    let n = field::<i32>("n");
    let c = n.is_in(1..=5);
    assert_eq!(c.to_sql(), "n BETWEEN $1 AND $2");
    assert_eq!(params(&c), "[1, 5]");
}

#[test]
fn descending_unit_step_swaps_bounds() {
    let n = field::<i32>("n");
    let c = n.is_in(down_to(5, 1));
    assert_eq!(c.to_sql(), "n BETWEEN $1 AND $2");
    assert_eq!(params(&c), "[1, 5]");
}

#[test]
fn strided_range_is_enumerated() {
    let n = field::<i64>("n");
    let c = n.is_in((1..=10).step(2));
    assert_eq!(c.to_sql(), "n IN ($1, $2, $3, $4, $5)");
    assert_eq!(params(&c), "[1, 3, 5, 7, 9]");
}

#[test]
fn not_in_range() {
    let n = field::<i32>("n");
    assert_eq!(n.not_in(1..=3).to_sql(), "n NOT BETWEEN $1 AND $2");
    assert_eq!(n.not_in((0..9).step(4)).to_sql(), "n NOT IN ($1, $2, $3)");
}

#[test]
fn char_range_binds_strings() {
    let grade = field::<char>("grade");
    let c = grade.is_in('a'..='c');
    assert_eq!(c.to_sql(), "grade BETWEEN $1 AND $2");
    assert_eq!(params(&c), r#"["a", "c"]"#);

    let c = grade.is_in(('a'..='e').step(2));
    assert_eq!(params(&c), r#"["a", "c", "e"]"#);
}

#[test]
fn membership_sources() {
    let id = field::<i64>("id");
    assert_eq!(id.is_in(vec![1, 2]).to_sql(), "id IN ($1, $2)");
    assert_eq!(id.is_in([7]).to_sql(), "id IN ($1)");
    let ids: &[i64] = &[4, 5, 6];
    assert_eq!(id.not_in(ids).to_sql(), "id NOT IN ($1, $2, $3)");
    assert_eq!(
        id.is_in(vec![field::<i64>("a"), field::<i64>("b")]).to_sql(),
        "id IN (a, b)"
    );
    let set = RecordSet::<Record1<i64>>::from_values(vec![9, 8]);
    assert_eq!(params(&id.is_in(set)), "[9, 8]");

    let owners = Table::new("owners").unwrap();
    assert_eq!(
        id.is_in(select(&owners.field::<i64>("id")).from(&owners)).to_sql(),
        "id IN (SELECT owners.id FROM owners)"
    );

    let name = field::<String>("name");
    assert_eq!(name.is_in(vec!["a", "b"]).to_sql(), "name IN ($1, $2)");
}

#[test]
fn empty_membership() {
    let id = field::<i64>("id");
    assert_eq!(id.is_in(Vec::<i64>::new()).to_sql(), "1=0");
    assert_eq!(id.not_in(Vec::<i64>::new()).to_sql(), "1=1");
}

#[test]
fn comparison_aliases_match() {
    let age = field::<i32>("age");
    let pairs = [
        (age.equal(1), age.eq(1), "age = $1"),
        (age.not_equal(1), age.ne(1), "age <> $1"),
        (age.less_than(1), age.lt(1), "age < $1"),
        (age.less_or_equal(1), age.le(1), "age <= $1"),
        (age.greater_than(1), age.gt(1), "age > $1"),
        (age.greater_or_equal(1), age.ge(1), "age >= $1"),
    ];
    for (long, short, expected) in pairs {
        assert_eq!(long.to_sql(), expected);
        assert_eq!(short.to_sql(), expected);
    }
}

#[test]
fn comparison_with_field_and_quantified_select() {
    let a = field::<i32>("a");
    let b = field::<i32>("b");
    assert_eq!(a.lt(&b).to_sql(), "a < b");
    let scores = Table::new("scores").unwrap();
    let c = a.eq(any(select(&scores.field::<i32>("v")).from(&scores)));
    assert_eq!(c.to_sql(), "a = ANY (SELECT scores.v FROM scores)");
}

#[test]
fn is_null_marker() {
    let deleted = field::<Option<String>>("deleted_at");
    assert_eq!(deleted.is(Is::Null).to_sql(), "deleted_at IS NULL");
    assert_eq!(deleted.is_not(Is::Null).to_sql(), "deleted_at IS NOT NULL");
}

#[test]
fn pattern_operators() {
    let name = field::<String>("name");
    assert_eq!(name.like("a%").to_sql(), "name LIKE $1");
    assert_eq!(name.not_like_ignore_case("a%").to_sql(), "name NOT ILIKE $1");
    assert_eq!(name.like_regex("^a").to_sql(), "name ~ $1");
    assert_eq!(name.not_like_regex("^a").to_sql(), "name !~ $1");
    assert_eq!(name.similar_to("(a|b)%").to_sql(), "name SIMILAR TO $1");
    assert_eq!(
        name.is_not_distinct_from(field::<String>("alias")).to_sql(),
        "name IS NOT DISTINCT FROM alias"
    );
    assert_eq!(
        name.equal_ignore_case("BOB").to_sql(),
        "lower(name) = lower($1)"
    );
    assert_eq!(
        name.not_equal_ignore_case("BOB").to_sql(),
        "lower(name) <> lower($1)"
    );
}

#[test]
fn patterns_apply_to_non_text_fields() {
    let email = field::<Option<String>>("email");
    let c = email.like("%@x.org");
    assert_eq!(c.to_sql(), "email LIKE $1");
    assert_eq!(params(&c), r#"["%@x.org"]"#);

    let code = field::<i32>("code");
    assert_eq!(code.similar_to("4__").to_sql(), "code SIMILAR TO $1");
    assert_eq!(code.not_like_regex("^5").to_sql(), "code !~ $1");
    assert_eq!(
        email.like_ignore_case(field::<String>("pattern")).to_sql(),
        "email ILIKE pattern"
    );
}

#[test]
fn contains_escapes_wildcards() {
    let name = field::<String>("name");
    let escaped = "replace(replace(replace($1, '!', '!!'), '%', '!%'), '_', '!_')";
    assert_eq!(
        name.contains("50%").to_sql(),
        format!("name LIKE (('%' || {escaped}) || '%') ESCAPE '!'")
    );
    assert_eq!(
        name.ends_with_ignore_case("x").to_sql(),
        format!("name ILIKE ('%' || {escaped}) ESCAPE '!'")
    );
    assert_eq!(
        name.not_contains("x").to_sql(),
        format!("name NOT LIKE (('%' || {escaped}) || '%') ESCAPE '!'")
    );
}

#[test]
fn between_ranges() {
    let n = field::<i32>("n");
    assert_eq!(n.between_range(1..=9).to_sql(), "n BETWEEN $1 AND $2");
    assert_eq!(
        n.not_between_symmetric_range(9..=1).to_sql(),
        "n NOT BETWEEN SYMMETRIC $1 AND $2"
    );
}

#[test]
fn sorting() {
    let status = field::<String>("status");
    assert!(status.sort_by(Vec::<(&str, i32)>::new()).is_none());
    let sort = status.sort_asc(vec!["new", "paid"]).unwrap();
    let q = select(&status).order_by(sort);
    assert_eq!(
        q.to_sql(),
        "SELECT status ORDER BY CASE status WHEN $1 THEN $2 WHEN $3 THEN $4 END ASC"
    );
    assert_eq!(params(&q), r#"["new", 0, "paid", 1]"#);

    let q = select(&status).order_by(status.desc());
    assert_eq!(q.to_sql(), "SELECT status ORDER BY status DESC");
}

#[test]
fn arithmetic_and_bitwise() {
    let flags: Field<i32> = field("flags");
    assert_eq!(flags.pow(2).to_sql(), "power(flags, $1)");
    assert_eq!(params(&flags.pow(2).eq(4.0)), "[2.0, 4.0]");
    assert_eq!(flags.power(&flags).to_sql(), "power(flags, flags)");
    assert_eq!(flags.bit_xnor(3).to_sql(), "~(flags # $1)");
    assert_eq!(flags.shr(1).to_sql(), "(flags >> $1)");
    assert_eq!(flags.bit_and(&flags).eq(0).to_sql(), "(flags & flags) = $1");
}

#[test]
fn condition_combinators() {
    let a = field::<i32>("a");
    let flag = field::<bool>("active");
    let c = a.gt(1).and(flag.clone()).or_not(a.eq(5));
    assert_eq!(c.to_sql(), "(a > $1 AND active) OR NOT (a = $2)");

    let c = no_condition().and(a.gt(1)).and(plain_sql("b IS NULL"));
    assert_eq!(c.to_sql(), "a > $1 AND (b IS NULL)");

    let c = a.eq(1).and("b = 2 OR c = 3");
    assert_eq!(c.to_sql(), "a = $1 AND (b = 2 OR c = 3)");

    let c = a.eq(1).or("b = 2 AND c = 3").and(a.lt(9));
    assert_eq!(c.to_sql(), "(a = $1 OR (b = 2 AND c = 3)) AND a < $2");

    let t = Table::new("t").unwrap();
    let c = a.gt(1).and_not_exists(select(&t.field::<i32>("x")).from(&t));
    assert_eq!(c.to_sql(), "a > $1 AND NOT EXISTS (SELECT t.x FROM t)");

    assert_eq!(a.gt(1).not().to_sql(), "NOT (a > $1)");
    assert!(no_condition().not().is_no_condition());
}

#[test]
fn combinators_do_not_mutate_inputs() {
    let a = field::<i32>("a");
    let base: Condition = a.gt(1);
    let _ = base.clone().and(a.lt(9));
    assert_eq!(base.to_sql(), "a > $1");
}
