//! Runs sessions over a batch of texts.
//!
//! The driver writes each session's spans back into its record before moving
//! on, so whatever the caller persists afterwards includes the progress made
//! up to a quit or a device failure.

use std::ops::Range;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::labels::LabelSet;
use crate::model::AnnotationRecord;
use crate::screen::Progress;
use crate::session::{AnnotationSession, Exit, FlagOutcome, FlagSession, Frontend};

/// Selects `limit` items starting at index `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub from: usize,
    pub limit: Option<usize>,
}

impl Window {
    pub fn new(from: usize, limit: Option<usize>) -> Self {
        Self { from, limit }
    }

    /// Index range of the window within `len` items
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let start = self.from.min(len);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(len),
            None => len,
        };
        start..end
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Texts a session was started on
    pub visited: usize,
    /// Texts finished with Enter (or decided, when flagging)
    pub completed: usize,
    /// Malformed records passed over
    pub skipped: usize,
    pub aborted: bool,
}

/// Annotate the records of `dataset` inside `window`.
///
/// Stops at the first quit. On a device error the current record receives
/// the spans labeled so far before the error is returned.
pub fn annotate_dataset<F: Frontend + ?Sized>(
    dataset: &mut Dataset,
    window: Window,
    labels: &Arc<LabelSet>,
    frontend: &mut F,
) -> Result<BatchReport> {
    let bounds = window.bounds(dataset.len());
    let total = bounds.len();
    let offset = bounds.start;
    let mut report = BatchReport::default();

    info!(from = bounds.start, to = bounds.end, "annotating dataset");

    for (i, entry) in dataset.entries_mut()[bounds].iter_mut().enumerate() {
        let record = match entry.record_mut(offset + i) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed record");
                report.skipped += 1;
                continue;
            }
        };

        report.visited += 1;
        match annotate_record(record, labels, frontend, Progress::new(i + 1, total))? {
            Exit::Completed => report.completed += 1,
            Exit::Aborted => {
                info!(index = offset + i, "annotation aborted");
                report.aborted = true;
                break;
            }
        }
    }

    Ok(report)
}

/// Annotate fresh texts, appending each to `dataset` once its session
/// ends. Texts after a quit are not added.
pub fn annotate_texts<F: Frontend + ?Sized>(
    dataset: &mut Dataset,
    texts: Vec<String>,
    labels: &Arc<LabelSet>,
    frontend: &mut F,
) -> Result<BatchReport> {
    let total = texts.len();
    let mut report = BatchReport::default();

    for (i, text) in texts.into_iter().enumerate() {
        let mut record = AnnotationRecord::new(text);
        report.visited += 1;
        let result = annotate_record(&mut record, labels, frontend, Progress::new(i + 1, total));
        dataset.push(record);

        match result? {
            Exit::Completed => report.completed += 1,
            Exit::Aborted => {
                info!(index = i, "annotation aborted");
                report.aborted = true;
                break;
            }
        }
    }

    Ok(report)
}

/// Run one session over `record`, writing its spans back on every exit
/// path, device errors included.
pub fn annotate_record<F: Frontend + ?Sized>(
    record: &mut AnnotationRecord,
    labels: &Arc<LabelSet>,
    frontend: &mut F,
    progress: Progress,
) -> Result<Exit> {
    let mut session = AnnotationSession::from_record(record, Arc::clone(labels));
    match session.run(frontend, progress) {
        Ok(outcome) => {
            let exit = if outcome.is_aborted() {
                Exit::Aborted
            } else {
                Exit::Completed
            };
            record.spans = outcome.into_spans();
            Ok(exit)
        }
        Err(e) => {
            record.spans = session.spans().to_vec();
            Err(e)
        }
    }
}

/// Flag each text as interesting or not, handing every decision to `sink`
/// as soon as it is made. Stops at the first quit.
pub fn flag_texts<F, S>(texts: &[String], frontend: &mut F, mut sink: S) -> Result<BatchReport>
where
    F: Frontend + ?Sized,
    S: FnMut(&str, bool) -> Result<()>,
{
    let mut report = BatchReport::default();

    for (i, text) in texts.iter().enumerate() {
        report.visited += 1;
        match FlagSession::new(text.as_str()).run(frontend, Progress::new(i + 1, texts.len()))? {
            FlagOutcome::Decided(interesting) => {
                sink(text, interesting)?;
                report.completed += 1;
            }
            FlagOutcome::Aborted => {
                info!(index = i, "flagging aborted");
                report.aborted = true;
                break;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::keymap::Key;
    use crate::model::Span;
    use crate::testing::ScriptedFrontend;

    fn labels() -> Arc<LabelSet> {
        Arc::new(LabelSet::keyword())
    }

    fn three_texts() -> Dataset {
        Dataset::from_records([
            AnnotationRecord::new("Hello, world!"),
            AnnotationRecord::new("alpha beta gamma"),
            AnnotationRecord::new("never reached"),
        ])
    }

    #[test]
    fn test_window_bounds() {
        assert_eq!(Window::default().bounds(5), 0..5);
        assert_eq!(Window::new(2, None).bounds(5), 2..5);
        assert_eq!(Window::new(1, Some(2)).bounds(5), 1..3);
        assert_eq!(Window::new(4, Some(10)).bounds(5), 4..5);
        assert_eq!(Window::new(9, Some(1)).bounds(5), 5..5);
    }

    #[test]
    fn test_quit_mid_batch_keeps_progress() {
        let mut dataset = three_texts();
        let mut frontend = ScriptedFrontend::new([
            // first text, fully labeled
            Key::Char('k'),
            Key::Right,
            Key::Char('k'),
            Key::Enter,
            // second text, one label then quit
            Key::Right,
            Key::Char('k'),
            Key::Char('q'),
            // would belong to the third text
            Key::Char('k'),
            Key::Enter,
        ]);

        let report = annotate_dataset(&mut dataset, Window::default(), &labels(), &mut frontend).unwrap();

        assert_eq!(
            report,
            BatchReport {
                visited: 2,
                completed: 1,
                skipped: 0,
                aborted: true
            }
        );
        let records: Vec<_> = dataset.records().collect();
        assert_eq!(
            records[0].spans,
            vec![Span::new(0, 5, "KEYWORD"), Span::new(7, 12, "KEYWORD")]
        );
        assert_eq!(records[1].spans, vec![Span::new(6, 10, "KEYWORD")]);
        assert!(records[2].spans.is_empty());

        // the third text was never shown and its keys never read
        assert_eq!(frontend.remaining(), 2);
        assert!(frontend.frames.iter().all(|f| f.text != "never reached"));
    }

    #[test]
    fn test_device_error_writes_back_partial_spans() {
        let mut dataset = three_texts();
        let mut frontend = ScriptedFrontend::new([Key::Enter, Key::Char('k')]);

        let err = annotate_dataset(&mut dataset, Window::default(), &labels(), &mut frontend).unwrap_err();

        assert!(matches!(err, Error::Device(_)));
        let records: Vec<_> = dataset.records().collect();
        assert_eq!(records[1].spans, vec![Span::new(0, 5, "KEYWORD")]);
    }

    #[test]
    fn test_window_and_malformed_entries() {
        let mut dataset = Dataset::from_json(
            r#"[
                ["skipped by window", {"entities": []}],
                ["broken", {}],
                ["labeled here", {"entities": []}]
            ]"#,
        )
        .unwrap();
        let mut frontend = ScriptedFrontend::new([Key::Char('k'), Key::Enter]);

        let report =
            annotate_dataset(&mut dataset, Window::new(1, None), &labels(), &mut frontend).unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.completed, 1);
        assert_eq!(frontend.last_frame().progress, Progress::new(2, 2));
        let records: Vec<_> = dataset.records().collect();
        assert!(records[0].spans.is_empty());
        assert_eq!(records[1].spans, vec![Span::new(0, 7, "KEYWORD")]);
    }

    #[test]
    fn test_annotate_texts_appends_only_visited() {
        let mut dataset = Dataset::from_records([AnnotationRecord::new("already here")]);
        let texts = vec!["new one".to_string(), "new two".to_string(), "new three".to_string()];
        let mut frontend = ScriptedFrontend::new([Key::Enter, Key::Right, Key::Char('k'), Key::Char('q')]);

        let report = annotate_texts(&mut dataset, texts, &labels(), &mut frontend).unwrap();

        assert!(report.aborted);
        assert_eq!(report.visited, 2);
        assert_eq!(dataset.len(), 3);
        let records: Vec<_> = dataset.records().collect();
        assert_eq!(records[1].text, "new one");
        assert!(records[1].spans.is_empty());
        assert_eq!(records[2].spans, vec![Span::new(4, 7, "KEYWORD")]);
        assert_eq!(frontend.last_frame().progress, Progress::new(2, 3));
    }

    #[test]
    fn test_flag_texts_stream_decisions() {
        let texts = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let mut frontend = ScriptedFrontend::new([Key::Enter, Key::Char(' '), Key::Char('q')]);
        let mut decisions = Vec::new();

        let report = flag_texts(&texts, &mut frontend, |text, interesting| {
            decisions.push((text.to_string(), interesting));
            Ok(())
        })
        .unwrap();

        assert!(report.aborted);
        assert_eq!(report.completed, 2);
        assert_eq!(
            decisions,
            vec![("first".to_string(), true), ("second".to_string(), false)]
        );
    }
}
