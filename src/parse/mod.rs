use itertools::Itertools;

use crate::cmd::pipeline::{Pipeline, Stage};

pub mod redirect;
pub mod token;

/// Splits one input line into pipeline stages on `|`.
///
/// Zero-length segments between delimiters are dropped, so `a||b` is two
/// stages. The last stage's trailing newline becomes a space. A line with no
/// segments at all still yields one (empty) stage.
pub fn parse_line(line: &str) -> Pipeline {
    let mut stages = line
        .split('|')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect_vec();

    match stages.last_mut() {
        Some(last) => {
            if let Some(pos) = last.rfind('\n') {
                last.replace_range(pos..=pos, " ");
            }
        }
        None => stages.push(String::new()),
    }

    trace!(stages = stages.len(), "split input line");

    Pipeline::from_stages(stages.into_iter().map(Stage::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &str) -> Vec<String> {
        parse_line(line)
            .stages()
            .iter()
            .map(|stage| stage.text().to_owned())
            .collect()
    }

    #[test]
    fn single_stage_keeps_text_and_swaps_newline() {
        assert_eq!(texts("echo hi\n"), vec!["echo hi "]);
    }

    #[test]
    fn splits_on_pipe_in_order() {
        assert_eq!(
            texts("printf a | sort | uniq\n"),
            vec!["printf a ", " sort ", " uniq "]
        );
    }

    #[test]
    fn only_the_last_stage_loses_its_newline() {
        let pipeline = parse_line("cat < in.txt | wc -l > out.txt\n");
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.boundaries(), 1);
        assert_eq!(pipeline.stages()[1].text(), " wc -l > out.txt ");
    }

    #[test]
    fn missing_newline_is_left_alone() {
        assert_eq!(texts("ls -l"), vec!["ls -l"]);
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(texts("ls||wc\n"), vec!["ls", "wc "]);
        assert_eq!(texts("|ls\n"), vec!["ls "]);
    }

    #[test]
    fn empty_line_is_one_blank_stage() {
        let pipeline = parse_line("\n");
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.is_blank());

        let pipeline = parse_line("");
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.is_blank());

        let pipeline = parse_line("|\n");
        assert_eq!(pipeline.len(), 1);
        assert!(pipeline.is_blank());
    }

    #[test]
    fn whitespace_stage_between_pipes_is_kept() {
        let pipeline = parse_line("ls | | wc\n");
        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_blank());
        assert!(pipeline.stages()[1].is_blank());
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: Pipeline = "echo a | cat\n".parse().unwrap();
        assert_eq!(parsed, Pipeline::parse("echo a | cat\n"));
    }
}
