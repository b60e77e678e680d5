//! JSON report

use crate::report::{ReportEntry, Summary};
use chrono::Local;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct Document<'a> {
    generated: String,
    summary: Summary,
    results: &'a [ReportEntry],
}

pub fn write<W: Write>(writer: &mut W, entries: &[ReportEntry]) -> serde_json::Result<()> {
    let doc = Document {
        generated: Local::now().to_rfc3339(),
        summary: Summary::from_entries(entries),
        results: entries,
    };
    serde_json::to_writer_pretty(writer, &doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{analyzed, failed};

    #[test]
    fn test_document_shape() {
        let mut out = Vec::new();
        write(&mut out, &[analyzed("AI/Edited", 0.07), failed("x.png")]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert!(value["generated"].is_string());
        assert_eq!(value["summary"]["ai_edited"], 1);
        assert_eq!(value["summary"]["failed"], 1);

        let first = &value["results"][0];
        assert_eq!(first["source"], "AI/Edited.png");
        assert_eq!(first["score"], 7);
        assert_eq!(first["status_icon"], "❌");
        assert!(first.get("image").is_none());

        let second = &value["results"][1];
        assert_eq!(second["source"], "x.png");
        assert!(second.get("score").is_none());
    }
}
