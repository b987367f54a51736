use pretty_assertions::assert_eq;

#[test]
fn golden_snapshot_math_list_quote_and_references() {
    let markup = include_str!("golden/heat_equation.md");
    let html = mathdown::render(markup);

    let expected = include_str!("golden/heat_equation.html");
    assert_eq!(html.trim_end(), expected.trim_end());
}

#[test]
fn golden_snapshot_without_math() {
    let markup = include_str!("golden/no_math.md");
    let html = mathdown::render(markup);

    let expected = include_str!("golden/no_math.html");
    assert_eq!(html.trim_end(), expected.trim_end());
}
