#[test]
fn ui_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/enum_basic.rs");
    t.pass("tests/ui/struct_basic.rs");
    t.pass("tests/ui/struct_informed.rs");
    t.pass("tests/ui/tuple_informed.rs");
}
