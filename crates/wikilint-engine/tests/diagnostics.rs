use pretty_assertions::assert_eq;
use rstest::rstest;
use wikilint_engine::{DiagnosticStore, RopeModel, Severity, StructuralLinter};

fn lint_rendered(text: &str) -> String {
    let model = RopeModel::from_text(text);
    let lines: Vec<String> = StructuralLinter::new(&model)
        .validate()
        .iter()
        .map(|d| {
            format!(
                "{} {:?} {}:{}-{}:{} {}",
                d.code,
                d.severity,
                d.start_line,
                d.start_column,
                d.end_line,
                d.end_column,
                d.message
            )
        })
        .collect();
    lines.join("\n")
}

#[rstest]
#[case::plain_prose("Just a paragraph of prose.\nAnd another line.")]
#[case::balanced_links("[[a]] and [[b|alias]] and [[c]]")]
#[case::templates_are_not_links("{{cite|url=[[x]]}} fine")]
#[case::literal_wraps_everything("<nowiki>[[a[[b]] ]] [[</nowiki>")]
#[case::close_without_open("]] stray closers ]]")]
#[case::empty("")]
fn clean_documents_produce_no_diagnostics(#[case] text: &str) {
    assert_eq!(lint_rendered(text), "");
}

#[test]
fn mixed_document_reports_each_problem_once() {
    let text = "== Heading ==\n\
                See [[Main Page]] and {{cite|x}}.\n\
                [[broken link\n\
                <pre>\n\
                [[inert]]\n\
                </pre>\n\
                text [[a[[b]] tail\n\
                <nowiki>still open";
    insta::assert_snapshot!(lint_rendered(text), @r"
    MW1004 Error 3:1-3:14 Link reference block is not closed.
    MW1005 Error 7:9-7:11 Cannot include nested link.
    MW1006 Warning 8:1-8:19 Literal block is not closed.
    ");
}

#[rstest]
#[case::angle_bracket_soup("[]<>", 0)]
#[case::stray_closers("]]", 0)]
#[case::opener_runs("[[", 1)]
#[case::literal_openers("<pre>", 1)]
fn adversarial_inputs_terminate(#[case] unit: &str, #[case] expected: usize) {
    let soup = unit.repeat(400);
    let model = RopeModel::from_text(&soup);
    assert_eq!(StructuralLinter::new(&model).validate().len(), expected);
}

#[test]
fn diagnostics_are_stable_across_passes() {
    let text = "[[a\n<pre>[[b]]</pre>\n[[c[[d]]";
    assert_eq!(lint_rendered(text), lint_rendered(text));
}

#[test]
fn errors_and_warnings_are_distinguished() {
    let model = RopeModel::from_text("[[open\n<nowiki>");
    let diags = StructuralLinter::new(&model).validate();
    let severities: Vec<Severity> = diags.iter().map(|d| d.severity).collect();
    assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
}

#[test]
fn publishing_a_fixed_document_clears_markers() {
    let mut store = DiagnosticStore::new();

    let broken = RopeModel::from_text("[[broken");
    StructuralLinter::new(&broken).publish(&mut store);
    assert!(!store.is_empty());

    let fixed = RopeModel::from_text("[[fixed]]");
    StructuralLinter::new(&fixed).publish(&mut store);
    assert!(store.is_empty());
}
