//! The ordered substitution stages.
//!
//! Each stage re-scans the output of the stage before it, so a later stage
//! only ever sees already-normalized occurrences of earlier shapes.

use std::ops::Range;

use super::tags::{self, TagKind};

/// Output of a single stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub content: String,
    /// Matches whose text differed from the canonical form.
    pub replacements: usize,
}

pub trait Stage {
    fn name(&self) -> &'static str;
    fn apply(&self, input: &str) -> StageOutput;
}

/// Replace each (sorted, non-overlapping) range with `canonical`.
fn splice(input: &str, ranges: &[Range<usize>], canonical: &str) -> StageOutput {
    let mut content = String::with_capacity(input.len());
    let mut replacements = 0;
    let mut last = 0;

    for range in ranges {
        content.push_str(&input[last..range.start]);
        content.push_str(canonical);
        if &input[range.clone()] != canonical {
            replacements += 1;
        }
        last = range.end;
    }
    content.push_str(&input[last..]);

    StageOutput {
        content,
        replacements,
    }
}

/// `<Element attrs... />`, attributes on one or more lines.
pub struct SelfClosingStage {
    element: String,
    canonical: String,
}

impl SelfClosingStage {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            canonical: canonical(element),
        }
    }
}

impl Stage for SelfClosingStage {
    fn name(&self) -> &'static str {
        "self-closing"
    }

    fn apply(&self, input: &str) -> StageOutput {
        let ranges: Vec<_> = tags::scan(input)
            .filter(|tag| {
                tag.kind == TagKind::SelfClosing
                    && tag.is_named(&self.element)
                    && tag.has_separated_attrs()
            })
            .map(|tag| tag.span())
            .collect();

        splice(input, &ranges, &self.canonical)
    }
}

/// `<Element attrs...>` + whitespace + `</Element>`.
///
/// The opener may also be self-closing: `<Element />\n</Element>` collapses
/// into a single canonical tag.
pub struct PairStage {
    element: String,
    canonical: String,
}

impl PairStage {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            canonical: canonical(element),
        }
    }
}

impl Stage for PairStage {
    fn name(&self) -> &'static str {
        "open-close pair"
    }

    fn apply(&self, input: &str) -> StageOutput {
        let mut ranges = Vec::new();
        let mut scanned = tags::scan(input).peekable();

        while let Some(tag) = scanned.next() {
            if !tag.is_named(&self.element) || !tag.has_separated_attrs() {
                continue;
            }

            let Some(next) = scanned.peek() else {
                break;
            };

            let only_whitespace_between = input[tag.end..next.start]
                .chars()
                .all(char::is_whitespace);

            if only_whitespace_between && next.is_bare_close(&self.element) {
                ranges.push(tag.start..next.end);
                scanned.next();
            }
        }

        splice(input, &ranges, &self.canonical)
    }
}

/// Self-closing `<Element` whose attributes continue over several lines.
///
/// Stage one already covers this shape, so on its own output this stage is
/// normally a no-op.
pub struct MultilineStage {
    element: String,
    canonical: String,
}

impl MultilineStage {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            canonical: canonical(element),
        }
    }
}

impl Stage for MultilineStage {
    fn name(&self) -> &'static str {
        "multi-line self-closing"
    }

    fn apply(&self, input: &str) -> StageOutput {
        let ranges: Vec<_> = tags::scan(input)
            .filter(|tag| {
                tag.kind == TagKind::SelfClosing
                    && tag.is_named(&self.element)
                    && tag.has_separated_attrs()
                    && tag.spans_lines()
            })
            .map(|tag| tag.span())
            .collect();

        splice(input, &ranges, &self.canonical)
    }
}

pub fn canonical(element: &str) -> String {
    format!("<{} />", element)
}

/// Result of running the whole pipeline over one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub content: String,
    pub replacements: usize,
}

/// The three stages, in order, for one element name.
pub struct Pipeline {
    element: String,
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn for_element(element: &str) -> Self {
        Self {
            element: element.to_string(),
            stages: vec![
                Box::new(SelfClosingStage::new(element)),
                Box::new(PairStage::new(element)),
                Box::new(MultilineStage::new(element)),
            ],
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn apply(&self, input: &str) -> Normalized {
        let mut content = input.to_string();
        let mut replacements = 0;

        for stage in &self.stages {
            let output = stage.apply(&content);
            replacements += output.replacements;
            content = output.content;
        }

        Normalized {
            content,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(input: &str) -> String {
        Pipeline::for_element("Widget").apply(input).content
    }

    #[test]
    fn stages_run_in_fixed_order() {
        let pipeline = Pipeline::for_element("Widget");

        assert_eq!(
            pipeline.stage_names(),
            vec!["self-closing", "open-close pair", "multi-line self-closing"]
        );
    }

    #[test]
    fn self_closing_with_attributes() {
        assert_eq!(normalize(r#"<Widget foo="1" bar="2" />"#), "<Widget />");
    }

    #[test]
    fn open_close_pair_across_lines() {
        assert_eq!(normalize("<Widget foo=\"1\">\n</Widget>"), "<Widget />");
        assert_eq!(normalize("<Widget foo=\"1\"></Widget>"), "<Widget />");
    }

    #[test]
    fn multi_line_self_closing() {
        let input = "<Widget\n  foo=\"1\"\n  bar=\"2\"\n/>";
        assert_eq!(normalize(input), "<Widget />");
    }

    #[test]
    fn similar_names_are_untouched() {
        let input = r#"<WidgetX foo="1" /><MyWidget foo="1" />"#;
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn canonical_form_is_not_counted() {
        let output = Pipeline::for_element("Widget").apply("<Widget />");

        assert_eq!(output.content, "<Widget />");
        assert_eq!(output.replacements, 0);
    }

    #[test]
    fn no_space_after_name_is_untouched() {
        assert_eq!(normalize("<Widget/>"), "<Widget/>");
        assert_eq!(normalize("<Widget></Widget>"), "<Widget></Widget>");
    }

    #[test]
    fn pair_with_children_is_untouched() {
        let input = r#"<Widget foo="1"><span /></Widget>"#;
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn quoted_gt_is_a_known_no_match() {
        let input = r#"<Widget title="a>b" />"#;
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn comparison_in_attribute_is_normalized() {
        assert_eq!(normalize("<Widget show={count<limit} />"), "<Widget />");
        assert_eq!(normalize("<Widget show={a<b}>\n</Widget>"), "<Widget />");
    }

    #[test]
    fn close_marker_in_string_attribute_is_normalized() {
        assert_eq!(normalize("<Widget t=\"a</b\">\n</Widget>"), "<Widget />");
    }

    #[test]
    fn nested_element_in_attribute_is_untouched() {
        let input = "<Widget a={<b/>} />";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn tag_text_after_whitespace_in_string_is_a_known_no_match() {
        let input = "<Widget t=\"a </b\">\n</Widget>";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn self_closing_followed_by_stray_close_collapses() {
        assert_eq!(normalize("<Widget foo=\"1\" />\n  </Widget>"), "<Widget />");
    }

    #[test]
    fn preserves_surrounding_text() {
        let input = "return (\n  <main>\n    <Widget year={2024} links={links} />\n  </main>\n);\n";
        let expected = "return (\n  <main>\n    <Widget />\n  </main>\n);\n";
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn counts_each_occurrence() {
        let input = "<Widget a=\"1\" />\n<Widget b=\"2\">\n</Widget>\n";
        let output = Pipeline::for_element("Widget").apply(input);

        assert_eq!(output.content, "<Widget />\n<Widget />\n");
        assert_eq!(output.replacements, 2);
    }

    #[test]
    fn second_pass_is_identity() {
        let input = "<Widget\n  a=\"1\"\n/>\n<Widget b=\"2\"></Widget>\n<WidgetX c=\"3\" />\n";
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn multiline_stage_alone_skips_single_line_tags() {
        let stage = MultilineStage::new("Widget");
        let input = "<Widget a=\"1\" />";

        assert_eq!(stage.apply(input).content, input);
    }

    #[test]
    fn multiline_stage_alone_rewrites_multi_line_tags() {
        let stage = MultilineStage::new("Widget");
        let output = stage.apply("<Widget\n  a=\"1\"\n/>");

        assert_eq!(output.content, "<Widget />");
        assert_eq!(output.replacements, 1);
    }
}
