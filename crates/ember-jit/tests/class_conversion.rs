//! Class descriptor → class definition tests

use ember_jit::{ClassDescriptor, CompileCache, Compiler, JitError, Visibility};
use serde_json::json;

fn point_descriptor() -> serde_json::Value {
    json!({
        "name": "Point",
        "extends": "Shape",
        "implements": ["Countable"],
        "properties": [
            ["/** @var int */", "x", "public", "", "long", "0"],
            [null, "label", "protected", "static", "string", "b3JpZ2luICdPJw=="],
            [null, "cache", "private", "", "array", null]
        ],
        "methods": [
            [["method", "public", "", "", "getX", 0], ["begin"],
                ["var", 0], ["propertyfetch", "x", "$this", 0], ["return", 0]],
            [["method", "public", "static", "final", "origin", 1], ["param", 0], ["begin"],
                ["const", 1, "long", "0"], ["var", 2], ["==", 0, 1, 2], ["return", 2]]
        ]
    })
}

#[test]
fn test_convert_point() {
    let class = ClassDescriptor::from_json(&point_descriptor()).unwrap();
    let mut compiler = Compiler::new();
    let code = compiler.lower_class(&class).unwrap();

    let expected = "class Point extends Shape implements Countable {\n\
public $x = 0;\n\
protected static $label = 'origin \\'O\\'';\n\
private $cache;\n\
public function getX() {\n$var2 = $this->x;\nreturn $var2;\n}\n\
public static final function origin($var2) {\n$var4 = $var2 == 0;\nreturn $var4;\n}\n\
\n}";
    assert_eq!(code, expected);
}

#[test]
fn test_methods_are_cached_by_name() {
    let class = ClassDescriptor::from_json(&point_descriptor()).unwrap();
    let mut compiler = Compiler::new();
    compiler.lower_class(&class).unwrap();

    assert_eq!(compiler.cache().len(), 2);
    assert!(compiler.cache().contains("getX"));
    assert!(compiler.cache().contains("origin"));

    // Converting again is served from the cache and stays identical.
    let again = compiler.lower_class(&class).unwrap();
    assert_eq!(again, Compiler::new().lower_class(&class).unwrap());
}

#[test]
fn test_descriptor_fields() {
    let class = ClassDescriptor::from_json(&point_descriptor()).unwrap();
    assert_eq!(class.properties[1].visibility, Visibility::Protected);
    assert_eq!(class.properties[2].default, None);
    assert_eq!(class.methods[1].modifiers.render(), "public static final");
}

#[test]
fn test_unknown_operation_in_method_body() {
    let value = json!({
        "name": "Broken",
        "methods": [[["method", "public", "", "", "m", 0], ["begin"], ["yield", 0]]]
    });
    let err = ClassDescriptor::from_json(&value).unwrap_err();
    assert!(matches!(err, JitError::InvalidOperation { .. }));
}

#[test]
fn test_unknown_visibility() {
    let value = json!({
        "name": "C",
        "methods": [[["method", "internal", "", "", "m", 0], ["begin"], ["return"]]]
    });
    assert!(matches!(ClassDescriptor::from_json(&value), Err(JitError::MalformedClass { .. })));
}
