//! Bounded pending-file queue with explicit command handling
//!
//! The queue is single-writer by construction: all mutation happens through
//! `&mut self` command handling, so no two mutations can interleave.
//! Extraction and evaluation for distinct files within one batch run
//! concurrently and are reassembled in input order.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use verigate_core::models::{
    FileVerdict, NormalizedMetadata, ProjectConfig, SubmissionFile, SubmissionPayload,
};
use verigate_core::validation::{is_valid_email, is_valid_user_id};
use verigate_processing::MetadataExtractor;

/// A file as presented by the user, before any processing.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub data: Bytes,
}

impl SelectedFile {
    /// Composite identity key: detects re-selection of an already-queued
    /// file without relying on object identity.
    pub fn identity_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.filename,
            self.size,
            self.last_modified.timestamp_millis()
        )
    }
}

/// A queued file with its computed verdict. Recomputed from scratch whenever
/// the file is re-processed; never updated incrementally.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub identity_key: String,
    pub file: SelectedFile,
    pub metadata: NormalizedMetadata,
    pub verdict: FileVerdict,
}

/// Commands accepted by the gate. UI callbacks translate interactions into
/// these rather than mutating shared state directly.
#[derive(Debug)]
pub enum GateCommand {
    AddFiles(Vec<SelectedFile>),
    RemoveFile(String),
}

/// Result of handling a command.
#[derive(Debug, PartialEq)]
pub enum GateEvent {
    BatchProcessed(BatchOutcome),
    FileRemoved { removed: bool },
}

/// Advisory outcome of one `AddFiles` batch.
#[derive(Debug, PartialEq)]
pub struct BatchOutcome {
    pub added: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub message: Option<String>,
}

/// Submitter identity fields, validated client-side before submission.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub user_id: String,
}

/// The client submission gate: a bounded queue of pending files plus the
/// project configuration they are checked against.
pub struct SubmissionGate {
    config: ProjectConfig,
    extractor: MetadataExtractor,
    queue: Vec<PendingFile>,
}

impl SubmissionGate {
    pub fn new(config: ProjectConfig, extractor: MetadataExtractor) -> Self {
        Self {
            config,
            extractor,
            queue: Vec::new(),
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn queue(&self) -> &[PendingFile] {
        &self.queue
    }

    pub fn hard_passing_count(&self) -> usize {
        self.queue.iter().filter(|p| p.verdict.hard_pass).count()
    }

    pub async fn handle(&mut self, command: GateCommand) -> GateEvent {
        match command {
            GateCommand::AddFiles(batch) => GateEvent::BatchProcessed(self.add_files(batch).await),
            GateCommand::RemoveFile(key) => GateEvent::FileRemoved {
                removed: self.remove_file(&key),
            },
        }
    }

    /// Ingest one batch of selected files: drop duplicates, enforce the
    /// capacity ceiling, then extract and evaluate the accepted files
    /// concurrently, appending results in presentation order.
    pub async fn add_files(&mut self, batch: Vec<SelectedFile>) -> BatchOutcome {
        let mut seen: std::collections::HashSet<String> =
            self.queue.iter().map(|p| p.identity_key.clone()).collect();

        let mut fresh = Vec::new();
        let mut duplicates = 0usize;
        for file in batch {
            let key = file.identity_key();
            if seen.insert(key) {
                fresh.push(file);
            } else {
                duplicates += 1;
            }
        }

        if fresh.is_empty() {
            return BatchOutcome {
                added: 0,
                duplicates,
                rejected: 0,
                message: None,
            };
        }

        let max_files = self.config.max_files as usize;
        let room = max_files.saturating_sub(self.queue.len());
        if room == 0 {
            tracing::debug!(max_files, "Batch rejected: queue at capacity");
            return BatchOutcome {
                added: 0,
                duplicates,
                rejected: fresh.len(),
                message: Some(format!("Maximum {} files allowed", self.config.max_files)),
            };
        }

        let rejected = fresh.len().saturating_sub(room);
        fresh.truncate(room);
        let added = fresh.len();

        let extractor = self.extractor.clone();
        let spec = &self.config.metadata_requirements;
        let processed = futures::future::join_all(fresh.into_iter().map(|file| {
            let extractor = extractor.clone();
            async move {
                let metadata = extractor
                    .extract(&file.filename, &file.content_type, &file.data)
                    .await;
                let verdict = verigate_core::rules::evaluate(&metadata, spec);
                PendingFile {
                    identity_key: file.identity_key(),
                    file,
                    metadata,
                    verdict,
                }
            }
        }))
        .await;
        self.queue.extend(processed);

        let message = if rejected > 0 {
            Some(format!(
                "Only {} of {} files accepted (maximum {} files)",
                added,
                added + rejected,
                self.config.max_files
            ))
        } else {
            None
        };

        BatchOutcome {
            added,
            duplicates,
            rejected,
            message,
        }
    }

    /// Remove one queued file by identity key. The only supported mutation
    /// besides appending a batch.
    pub fn remove_file(&mut self, identity_key: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain(|p| p.identity_key != identity_key);
        before != self.queue.len()
    }

    /// All blocking reasons, or `Ok` when a submission may be attempted.
    /// Soft failures never appear here; they are advisory only.
    pub fn check_eligibility(&self, identity: &Identity) -> Result<(), Vec<String>> {
        let mut reasons = Vec::new();

        if identity.name.trim().is_empty()
            || identity.email.trim().is_empty()
            || identity.user_id.trim().is_empty()
        {
            reasons.push("Name, email, and user ID are required".to_string());
        }
        if !identity.email.trim().is_empty() && !is_valid_email(&identity.email) {
            reasons.push("Invalid email format".to_string());
        }
        if !identity.user_id.trim().is_empty() && !is_valid_user_id(&identity.user_id) {
            reasons.push("User ID must contain only numbers".to_string());
        }
        if !self.config.stores_submissions() {
            reasons.push(
                "This project is self-check only; submissions are not stored".to_string(),
            );
        }
        let passing = self.hard_passing_count();
        let required = self.config.required_files as usize;
        if passing < required {
            reasons.push(format!(
                "Need at least {} files passing required checks (have {})",
                required, passing
            ));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }

    /// Build the wire payload from the hard-passing subset only. Files that
    /// failed hard rules stay visible in the queue but are silently excluded
    /// here. Constructed fresh per submit attempt.
    pub fn build_payload(&self, identity: &Identity) -> Result<SubmissionPayload, Vec<String>> {
        self.check_eligibility(identity)?;

        let files = self
            .queue
            .iter()
            .filter(|p| p.verdict.hard_pass)
            .map(|p| SubmissionFile {
                filename: p.file.filename.clone(),
                content_type: p.file.content_type.clone(),
                size: p.file.size,
                metadata: serde_json::to_value(&p.metadata)
                    .unwrap_or(serde_json::Value::Null),
                validation: serde_json::to_value(p.verdict.summary())
                    .unwrap_or(serde_json::Value::Null),
            })
            .collect();

        Ok(SubmissionPayload {
            user_name: identity.name.trim().to_string(),
            user_email: identity.email.trim().to_string(),
            user_id: identity.user_id.trim().to_string(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use verigate_core::models::{ProjectMode, RuleSpec};

    fn file(name: &str, mtime_ms: i64) -> SelectedFile {
        SelectedFile {
            filename: name.to_string(),
            content_type: "text/plain".to_string(),
            size: 10,
            last_modified: Utc.timestamp_millis_opt(mtime_ms).unwrap(),
            data: Bytes::from_static(b"plain text"),
        }
    }

    fn png_file(name: &str, width: u32, height: u32) -> SelectedFile {
        let img = image_bytes(width, height);
        SelectedFile {
            filename: name.to_string(),
            content_type: "image/png".to_string(),
            size: img.len() as u64,
            last_modified: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            data: Bytes::from(img),
        }
    }

    fn image_bytes(width: u32, height: u32) -> Vec<u8> {
        // Encoded through the same crate the reader decodes with.
        let img = image::RgbaImage::new(width, height);
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    fn config(required: u32, max: u32) -> ProjectConfig {
        ProjectConfig {
            required_files: required,
            max_files: max,
            allowed_file_types: vec![],
            metadata_requirements: Default::default(),
            mode: ProjectMode::Audit,
            instructions: None,
            email_recipient: None,
        }
    }

    fn gate(config: ProjectConfig) -> SubmissionGate {
        SubmissionGate::new(config, MetadataExtractor::new("ffprobe"))
    }

    fn identity() -> Identity {
        Identity {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            user_id: "12345".to_string(),
        }
    }

    #[tokio::test]
    async fn reselecting_a_queued_file_is_a_no_op() {
        let mut gate = gate(config(1, 5));
        let outcome = gate.add_files(vec![file("a.txt", 100)]).await;
        assert_eq!(outcome.added, 1);

        let outcome = gate.add_files(vec![file("a.txt", 100)]).await;
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(gate.queue().len(), 1);
    }

    #[tokio::test]
    async fn same_name_different_mtime_is_a_new_file() {
        let mut gate = gate(config(1, 5));
        gate.add_files(vec![file("a.txt", 100)]).await;
        let outcome = gate.add_files(vec![file("a.txt", 200)]).await;
        assert_eq!(outcome.added, 1);
        assert_eq!(gate.queue().len(), 2);
    }

    #[tokio::test]
    async fn queue_never_exceeds_max_files() {
        let mut gate = gate(config(1, 3));
        for batch in 0i64..4 {
            let files = (0i64..2)
                .map(|i| file(&format!("f{}-{}.txt", batch, i), batch * 10 + i))
                .collect();
            gate.add_files(files).await;
            assert!(gate.queue().len() <= 3, "len {}", gate.queue().len());
        }
        assert_eq!(gate.queue().len(), 3);
    }

    #[tokio::test]
    async fn full_queue_rejects_whole_batch_with_message() {
        let mut gate = gate(config(1, 1));
        gate.add_files(vec![file("a.txt", 1)]).await;
        let outcome = gate.add_files(vec![file("b.txt", 2)]).await;
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.message.as_deref(), Some("Maximum 1 files allowed"));
    }

    #[tokio::test]
    async fn partial_acceptance_keeps_presentation_order() {
        let mut gate = gate(config(1, 2));
        let outcome = gate
            .add_files(vec![file("a.txt", 1), file("b.txt", 2), file("c.txt", 3)])
            .await;
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.rejected, 1);
        assert!(outcome.message.is_some());
        let names: Vec<_> = gate.queue().iter().map(|p| p.file.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn results_are_reassembled_in_input_order() {
        let mut gate = gate(config(1, 10));
        let batch: Vec<_> = (0i64..6).map(|i| file(&format!("f{}.txt", i), i)).collect();
        gate.add_files(batch).await;
        let names: Vec<_> = gate.queue().iter().map(|p| p.file.filename.as_str()).collect();
        assert_eq!(names, vec!["f0.txt", "f1.txt", "f2.txt", "f3.txt", "f4.txt", "f5.txt"]);
    }

    #[tokio::test]
    async fn removal_by_identity_key() {
        let mut gate = gate(config(1, 5));
        gate.add_files(vec![file("a.txt", 1), file("b.txt", 2)]).await;
        let key = gate.queue()[0].identity_key.clone();

        let event = gate.handle(GateCommand::RemoveFile(key.clone())).await;
        assert_eq!(event, GateEvent::FileRemoved { removed: true });
        assert_eq!(gate.queue().len(), 1);

        let event = gate.handle(GateCommand::RemoveFile(key)).await;
        assert_eq!(event, GateEvent::FileRemoved { removed: false });
    }

    #[tokio::test]
    async fn removed_file_can_be_reselected() {
        let mut gate = gate(config(1, 5));
        gate.add_files(vec![file("a.txt", 1)]).await;
        let key = gate.queue()[0].identity_key.clone();
        gate.remove_file(&key);
        let outcome = gate.add_files(vec![file("a.txt", 1)]).await;
        assert_eq!(outcome.added, 1);
    }

    #[tokio::test]
    async fn payload_contains_only_hard_passing_files() {
        // gps is hard-required; plain text files fail it, images without
        // EXIF fail it too, so pair a permissive spec with a strict one.
        let mut config = config(1, 5);
        config
            .metadata_requirements
            .insert("resolution".to_string(), {
                let mut rule = RuleSpec::required_hard();
                rule.min_long_edge = Some(4);
                rule
            });
        let mut gate = gate(config);
        gate.add_files(vec![png_file("big.png", 8, 4), png_file("small.png", 2, 2)])
            .await;
        assert_eq!(gate.hard_passing_count(), 1);

        let payload = gate.build_payload(&identity()).expect("eligible");
        assert_eq!(payload.files.len(), 1);
        assert_eq!(payload.files[0].filename, "big.png");
        // failed file stays visible in the queue
        assert_eq!(gate.queue().len(), 2);
    }

    #[tokio::test]
    async fn eligibility_requires_enough_passing_files() {
        let mut gate = gate(config(2, 5));
        gate.add_files(vec![file("a.txt", 1)]).await;
        let err = gate.check_eligibility(&identity()).unwrap_err();
        assert!(err.iter().any(|r| r.contains("at least 2")), "{:?}", err);
    }

    #[tokio::test]
    async fn eligibility_validates_identity_fields() {
        let mut gate = gate(config(1, 5));
        gate.add_files(vec![file("a.txt", 1)]).await;

        let mut bad = identity();
        bad.email = "nope".to_string();
        bad.user_id = "12a".to_string();
        let err = gate.check_eligibility(&bad).unwrap_err();
        assert!(err.iter().any(|r| r.contains("email")));
        assert!(err.iter().any(|r| r.contains("only numbers")));

        let empty = Identity {
            name: " ".to_string(),
            email: String::new(),
            user_id: String::new(),
        };
        let err = gate.check_eligibility(&empty).unwrap_err();
        assert!(err.iter().any(|r| r.contains("required")));
    }

    #[tokio::test]
    async fn self_check_projects_never_submit() {
        let mut cfg = config(1, 5);
        cfg.mode = ProjectMode::SelfCheck;
        let mut gate = gate(cfg);
        gate.add_files(vec![file("a.txt", 1)]).await;
        let err = gate.build_payload(&identity()).unwrap_err();
        assert!(err.iter().any(|r| r.contains("self-check")), "{:?}", err);
    }

    #[tokio::test]
    async fn soft_only_specs_keep_files_eligible() {
        let mut cfg = config(1, 5);
        cfg.metadata_requirements
            .insert("gps".to_string(), RuleSpec::required_soft());
        cfg.metadata_requirements
            .insert("timestamp".to_string(), RuleSpec::required_soft());
        let mut gate = gate(cfg);
        gate.add_files(vec![png_file("x.png", 2, 2)]).await;

        let pending = &gate.queue()[0];
        assert!(!pending.verdict.soft_failures.is_empty());
        assert!(pending.verdict.hard_pass);
        assert!(gate.check_eligibility(&identity()).is_ok());
    }

    #[tokio::test]
    async fn payload_identity_fields_are_trimmed() {
        let mut gate = gate(config(1, 5));
        gate.add_files(vec![file("a.txt", 1)]).await;
        let padded = Identity {
            name: " Ada ".to_string(),
            email: " ada@example.com ".to_string(),
            user_id: " 12345 ".to_string(),
        };
        let payload = gate.build_payload(&padded).expect("eligible");
        assert_eq!(payload.user_name, "Ada");
        assert_eq!(payload.user_email, "ada@example.com");
        assert_eq!(payload.user_id, "12345");
    }
}
