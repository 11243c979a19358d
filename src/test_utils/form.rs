use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("bad selector {css:?}: {error}"))
}

/// The first form on the page.
#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form"))
        .next()
        .expect("No form found")
}

#[track_caller]
fn must_get_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&selector(&format!("input[name=\"{name}\"]")))
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""))
}

/// Check that the form sends its data to `endpoint` with the htmx `attribute`,
/// e.g. `hx-post` or `hx-put`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form.value().attr(attribute);

    assert_eq!(
        got,
        Some(endpoint),
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// Check that the form has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = must_get_input(form, name);

    assert_eq!(
        input.value().attr("type"),
        Some(type_),
        "want input {name} with type \"{type_}\""
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input {name} to be required"
    );
}

/// Like [assert_form_input], and also check the prefilled value.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let got = must_get_input(form, name).value().attr("value");
    assert_eq!(got, Some(value), "want input {name} with value \"{value}\"");
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = form
        .select(&selector("button[type=\"submit\"]"))
        .next()
        .expect("No submit button found");

    let got_text: String = button.text().collect();
    assert_eq!(got_text.trim(), text);
}
