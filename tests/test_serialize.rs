use phpqs::{Config, QueryMap, Value};

use pretty_assertions::assert_eq;

fn minimal() -> Config {
    Config::new().use_form_encoding(false)
}

#[test]
fn serialize_flat() {
    let map = phpqs::parse_str("firstname=Conan&surname=O%27Brien");
    insta::assert_snapshot!(phpqs::to_string(&map).unwrap(), @"firstname=Conan&surname=O%27Brien");
    insta::assert_snapshot!(minimal().serialize_string(&map).unwrap(), @"firstname=Conan&surname=O'Brien");
}

#[test]
fn serialize_nested() {
    let map = phpqs::parse_str("arr[2][]=deedee&arr[][4]=wiz&dict[k1][k2]=v1");
    insta::assert_snapshot!(
        minimal().serialize_string(&map).unwrap(),
        @"arr[2][0]=deedee&arr[3][4]=wiz&dict[k1][k2]=v1"
    );
    insta::assert_snapshot!(
        phpqs::to_string(&map).unwrap(),
        @"arr%5B2%5D%5B0%5D=deedee&arr%5B3%5D%5B4%5D=wiz&dict%5Bk1%5D%5Bk2%5D=v1"
    );
}

#[test]
fn serialize_escapes_syntax_inside_keys_and_values() {
    let mut inner = QueryMap::new();
    inner.set("x[y]", Value::from("a&b=c"));
    let mut map = QueryMap::new();
    map.set("k", Value::from(inner));
    map.set("pct", Value::from("100%"));

    insta::assert_snapshot!(
        minimal().serialize_string(&map).unwrap(),
        @"k[x%5By%5D]=a%26b%3Dc&pct=100%25"
    );
}

#[test]
fn serialize_spaces_and_unicode() {
    let map = QueryMap::from_iter([("q", "crème brûlée *")]);
    insta::assert_snapshot!(phpqs::to_string(&map).unwrap(), @"q=cr%C3%A8me+br%C3%BBl%C3%A9e+%2A");
    insta::assert_snapshot!(minimal().serialize_string(&map).unwrap(), @"q=cr%C3%A8me+br%C3%BBl%C3%A9e+*");
}

#[test]
fn serialize_skips_empty_maps() {
    let mut map = QueryMap::new();
    map.set("a", Value::from(QueryMap::new()));
    map.set("b", Value::from(""));
    assert_eq!(phpqs::to_string(&map).unwrap(), "b=");
}

#[test]
fn serialize_empty() {
    assert_eq!(phpqs::to_string(&QueryMap::new()).unwrap(), "");
}

#[test]
fn serialize_to_writer() {
    let map = phpqs::parse_str("a[]=1&a[]=2");
    let mut buffer = Vec::new();
    minimal().serialize_to_writer(&map, &mut buffer).unwrap();
    assert_eq!(buffer, b"a[0]=1&a[1]=2");

    let mut buffer = Vec::new();
    phpqs::to_writer(&map, &mut buffer).unwrap();
    assert_eq!(buffer, b"a%5B0%5D=1&a%5B1%5D=2");
}

#[test]
fn serialize_through_serde() {
    // integer keys stay numbers, order is preserved
    let map = phpqs::parse_str("z=1&arr[]=A&arr[foo]=B&a=");
    let json = serde_json::to_string(&map).unwrap();
    insta::assert_snapshot!(json, @r#"{"z":"1","arr":{"0":"A","foo":"B"},"a":""}"#);

    let value: serde_json::Value = serde_json::to_value(&map).unwrap();
    assert_eq!(value["arr"]["0"], "A");
}

#[test]
fn debug_shows_nested_structure() {
    let map = phpqs::parse_str("a[]=x&b=y");
    assert_eq!(format!("{map:?}"), r#"{"a": {0: "x"}, "b": "y"}"#);
}
