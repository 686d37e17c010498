//! Job lifecycle tests for the manager.

mod test_utils;

use repurpose_core::{
    ContentMetadata, JobStatus, Platform, ProcessRequest, PromptSource, SourceType, StoredFile,
    Upload,
};
use repurpose_error::{BuilderErrorKind, JobErrorKind, RepurposeError, RepurposeErrorKind};
use repurpose_interface::{DefaultPrompts, FileStore, RecordStore};
use repurpose_pipeline::{JobManager, PipelineConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use test_utils::*;

fn job_error(err: &RepurposeError) -> Option<&JobErrorKind> {
    match err.kind() {
        RepurposeErrorKind::Job(e) => Some(&e.kind),
        _ => None,
    }
}

#[tokio::test]
async fn test_text_job_yields_one_result_per_platform_in_order() {
    let harness = Harness::new(ScriptedGenerator::new());

    let handles = harness
        .manager
        .create_jobs(text_submission("Launch day notes", &["twitter", "threads"]))
        .await
        .unwrap();

    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0].job_id, handles[1].job_id);
    assert_eq!(handles[0].platform, "twitter");
    assert_eq!(handles[1].platform, "threads");

    let job = harness.manager.process_job(&handles[0].job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.error.is_none());

    let results = harness
        .manager
        .get_job_results(&job.id)
        .await
        .unwrap()
        .unwrap();
    let platforms: Vec<&str> = results
        .platform_results
        .iter()
        .map(|r| r.platform.as_str())
        .collect();
    assert_eq!(platforms, vec!["twitter", "threads"]);
    assert!(results.platform_results.iter().all(|r| r.success));
    assert_eq!(results.source_text.as_deref(), Some("Launch day notes"));

    let twitter = harness.generator.call_for("twitter").unwrap();
    assert_eq!(twitter.prompt.as_deref(), Some("GLOBAL\n\nTWITTER"));
    assert_eq!(twitter.source_text.as_deref(), Some("Launch day notes"));
    let threads = harness.generator.call_for("threads").unwrap();
    assert_eq!(threads.prompt.as_deref(), Some("GLOBAL\n\nTHREADS"));
}

#[tokio::test]
async fn test_custom_prompt_reaches_generator_through_alias() {
    let harness = Harness::new(ScriptedGenerator::new());

    let submission = repurpose_core::JobSubmission::builder()
        .source_type(SourceType::Text)
        .content("Release notes")
        .targets(strings(&["wordpress"]))
        .custom_prompts(HashMap::from([(
            "blog".to_string(),
            "Write a haiku".to_string(),
        )]))
        .build()
        .unwrap();

    let job = harness.run(submission).await;
    assert_eq!(job.status, JobStatus::Completed);

    let call = harness.generator.call_for("wordpress").unwrap();
    assert_eq!(call.prompt.as_deref(), Some("Write a haiku"));

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    let detail = &history[0].used_prompts["wordpress"];
    assert_eq!(detail.normalized_platform, Platform::Blog);
    assert_eq!(detail.global_source, PromptSource::Custom);
    assert_eq!(detail.final_prompt, "Write a haiku");
}

#[tokio::test]
async fn test_partial_failure_completes_job() {
    let harness = Harness::new(ScriptedGenerator::new().fail("threads", "quota exceeded"));

    let job = harness
        .run(text_submission("Hello", &["twitter", "threads"]))
        .await;
    assert_eq!(job.status, JobStatus::Completed);

    let results = harness
        .manager
        .get_job_results(&job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(results.success_count(), 1);

    let twitter = &results.platform_results[0];
    assert!(twitter.success);
    assert_eq!(
        twitter.content.as_ref().unwrap().body,
        ScriptedGenerator::body_for("twitter")
    );
    assert!(twitter.error.is_none());

    let threads = &results.platform_results[1];
    assert!(!threads.success);
    assert!(threads.content.is_none());
    assert_eq!(threads.error.as_deref(), Some("quota exceeded"));

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(history.len(), 1);
    let platforms: Vec<&str> = history[0]
        .generated_content
        .iter()
        .map(|c| c.platform.as_str())
        .collect();
    assert_eq!(platforms, vec!["twitter"]);
    assert_eq!(
        history[0].used_prompts.keys().collect::<Vec<_>>(),
        vec!["twitter"]
    );
}

#[tokio::test]
async fn test_all_platforms_failing_still_completes_and_records_history() {
    let harness = Harness::new(
        ScriptedGenerator::new()
            .fail("twitter", "rate limited")
            .fail("threads", "rate limited"),
    );

    let job = harness
        .run(text_submission("Hello", &["twitter", "threads"]))
        .await;
    assert_eq!(job.status, JobStatus::Completed);

    let results = harness
        .manager
        .get_job_results(&job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(results.success_count(), 0);
    assert_eq!(results.platform_results.len(), 2);

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].generated_content.is_empty());
    assert!(history[0].used_prompts.is_empty());
}

#[tokio::test]
async fn test_duplicate_targets_collapse_to_one_handle_and_result() {
    let harness = Harness::new(ScriptedGenerator::new());

    let handles = harness
        .manager
        .create_jobs(text_submission("Hello", &["twitter", "twitter", "threads"]))
        .await
        .unwrap();
    assert_eq!(handles.len(), 2);

    harness.manager.process_job(&handles[0].job_id).await.unwrap();
    let results = harness
        .manager
        .get_job_results(&handles[0].job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(results.platform_results.len(), 2);
    assert_eq!(harness.generator.calls().len(), 2);
}

#[tokio::test]
async fn test_unknown_target_is_dispatched_without_prompt() {
    let harness = Harness::new(ScriptedGenerator::new());

    let job = harness
        .run(text_submission("Hello", &["twitter", "myspace"]))
        .await;
    assert_eq!(job.status, JobStatus::Completed);

    let call = harness.generator.call_for("myspace").unwrap();
    assert!(call.prompt.is_none());
    assert!(call.platform.is_none());

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(history[0].generated_content.len(), 2);
    assert!(history[0].used_prompts.contains_key("twitter"));
    assert!(!history[0].used_prompts.contains_key("myspace"));
}

#[tokio::test]
async fn test_no_recognized_target_fails_job() {
    let harness = Harness::new(ScriptedGenerator::new());

    let job = harness
        .run(text_submission("Hello", &["myspace", "friendster"]))
        .await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.error.as_deref(),
        Some("No recognized platform among targets: myspace, friendster")
    );
    assert!(harness.generator.calls().is_empty());
    assert!(harness.manager.get_job_results(&job.id).await.unwrap().is_none());
    assert!(
        harness
            .manager
            .get_content_history(None, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_audio_job_reads_stored_file_and_previews() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.preview(Arc::new(StaticPreview))
    });

    let upload = Upload::new(b"ID3 audio bytes".to_vec(), "episode.mp3", "audio/mpeg");
    let handles = harness
        .manager
        .create_jobs(media_submission(SourceType::Audio, upload, &["blog"]))
        .await
        .unwrap();
    let job_id = handles[0].job_id.clone();

    let job = harness.manager.get_job(&job_id).await.unwrap().unwrap();
    let path = job.stored_file_ref.clone().unwrap();
    assert!(path.starts_with("audio/"));

    let request = harness.requests.load(&job_id).await.unwrap().unwrap();
    let stored = request.stored_file.clone().unwrap();
    assert_eq!(stored.path, path);
    assert_eq!(stored.size, 15);
    assert!(request.content.is_none());

    let job = harness.manager.process_job(&job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let call = harness.generator.call_for("blog").unwrap();
    assert_eq!(call.media_bytes, Some(15));
    assert!(call.source_text.is_none());

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(history[0].source_type, SourceType::Audio);
    assert_eq!(history[0].file_info.as_ref().unwrap().path, path);
    let preview = history[0].preview.as_ref().unwrap();
    assert_eq!(preview.transcript.as_deref(), Some("transcript of episode.mp3"));
}

#[tokio::test]
async fn test_preview_failure_does_not_fail_job() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.preview(Arc::new(FailingPreview))
    });

    let upload = Upload::new(b"RIFF video".to_vec(), "clip.mp4", "video/mp4");
    let job = harness
        .run(media_submission(SourceType::Video, upload, &["youtube"]))
        .await;
    assert_eq!(job.status, JobStatus::Completed);

    let history = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].preview.is_none());
    assert_eq!(history[0].generated_content.len(), 1);
}

#[tokio::test]
async fn test_video_upload_is_transcoded_before_storage() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.transcoder(Arc::new(WebmTranscoder))
    });

    let upload = Upload::new(b"mov".to_vec(), "clip.mov", "video/quicktime");
    let handles = harness
        .manager
        .create_jobs(media_submission(SourceType::Video, upload, &["youtube"]))
        .await
        .unwrap();

    let request = harness
        .requests
        .load(&handles[0].job_id)
        .await
        .unwrap()
        .unwrap();
    let stored: StoredFile = request.stored_file.unwrap();
    assert_eq!(stored.mime_type, "video/webm");
    assert_eq!(stored.name, "clip.mov.webm");
    assert_eq!(
        harness.files.get(&stored.path).await.unwrap().unwrap(),
        b"WEBMmov".to_vec()
    );
}

#[tokio::test]
async fn test_transcoder_failure_stores_original_upload() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.transcoder(Arc::new(FailingTranscoder))
    });

    let upload = Upload::new(b"mov".to_vec(), "clip.mov", "video/quicktime");
    let handles = harness
        .manager
        .create_jobs(media_submission(SourceType::Video, upload, &["youtube"]))
        .await
        .unwrap();

    let request = harness
        .requests
        .load(&handles[0].job_id)
        .await
        .unwrap()
        .unwrap();
    let stored = request.stored_file.unwrap();
    assert_eq!(stored.mime_type, "video/quicktime");
    assert_eq!(
        harness.files.get(&stored.path).await.unwrap().unwrap(),
        b"mov".to_vec()
    );
}

#[tokio::test]
async fn test_audio_is_never_transcoded() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.transcoder(Arc::new(WebmTranscoder))
    });

    let upload = Upload::new(b"mp3".to_vec(), "episode.mp3", "audio/mpeg");
    let handles = harness
        .manager
        .create_jobs(media_submission(SourceType::Audio, upload, &["blog"]))
        .await
        .unwrap();

    let request = harness
        .requests
        .load(&handles[0].job_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.stored_file.unwrap().mime_type, "audio/mpeg");
}

#[tokio::test]
async fn test_failed_job_save_removes_request_and_upload() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.jobs(Arc::new(UnavailableStore))
    });

    let upload = Upload::new(b"orphan audio".to_vec(), "episode.mp3", "audio/mpeg");
    let err = harness
        .manager
        .create_jobs(media_submission(SourceType::Audio, upload, &["blog"]))
        .await
        .unwrap_err();

    assert!(err.reason().contains("disk full"));
    assert!(harness.requests.is_empty().await);
    assert!(harness.files.is_empty().await);
}

#[tokio::test]
async fn test_failed_job_save_keeps_upload_shared_with_another_request() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.jobs(Arc::new(UnavailableStore))
    });

    let bytes = b"shared audio".to_vec();
    let existing = harness
        .files
        .put(&bytes, "episode.mp3", "audio/mpeg")
        .await
        .unwrap();
    harness
        .requests
        .save(&ProcessRequest {
            job_id: "earlier-job".to_string(),
            source_type: SourceType::Audio,
            content: None,
            stored_file: Some(existing.clone()),
            targets: strings(&["blog"]),
            profile: Default::default(),
            custom_prompts: HashMap::new(),
            user_id: None,
        })
        .await
        .unwrap();

    let upload = Upload::new(bytes, "episode.mp3", "audio/mpeg");
    assert!(
        harness
            .manager
            .create_jobs(media_submission(SourceType::Audio, upload, &["blog"]))
            .await
            .is_err()
    );

    assert_eq!(harness.requests.len().await, 1);
    assert!(harness.files.get(&existing.path).await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_stored_file_fails_job() {
    let harness = Harness::new(ScriptedGenerator::new());

    let upload = Upload::new(b"audio".to_vec(), "episode.mp3", "audio/mpeg");
    let handles = harness
        .manager
        .create_jobs(media_submission(SourceType::Audio, upload, &["blog"]))
        .await
        .unwrap();
    let job_id = handles[0].job_id.clone();

    let job = harness.manager.get_job(&job_id).await.unwrap().unwrap();
    let path = job.stored_file_ref.unwrap();
    harness.files.delete(&path).await.unwrap();

    let job = harness.manager.process_job(&job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    let error = job.error.unwrap();
    assert!(error.contains("unavailable"), "unexpected error: {}", error);
    assert!(error.contains(&path));

    assert!(harness.manager.get_job_results(&job_id).await.unwrap().is_none());
    assert!(harness.generator.calls().is_empty());
    assert!(
        harness
            .manager
            .get_content_history(None, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_missing_request_fails_job() {
    let harness = Harness::new(ScriptedGenerator::new());

    let handles = harness
        .manager
        .create_jobs(text_submission("Hello", &["twitter"]))
        .await
        .unwrap();
    let job_id = handles[0].job_id.clone();
    assert!(harness.requests.delete(&job_id).await.unwrap());

    let job = harness.manager.process_job(&job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_result_persistence_failure_fails_job() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.results(Arc::new(UnavailableStore))
    });

    let job = harness.run(text_submission("Hello", &["twitter"])).await;
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("disk full"));
}

#[tokio::test]
async fn test_history_persistence_failure_keeps_job_completed() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.metadata(Arc::new(UnavailableStore))
    });

    let job = harness.run(text_submission("Hello", &["twitter"])).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert!(
        harness
            .manager
            .get_job_results(&job.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_unreachable_prompt_store_degrades_to_defaults() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.prompt_store(Arc::new(UnavailablePromptStore))
    });

    let submission = repurpose_core::JobSubmission::builder()
        .source_type(SourceType::Text)
        .content("Hello")
        .targets(strings(&["twitter"]))
        .user_id("alice")
        .build()
        .unwrap();

    let job = harness.run(submission).await;
    assert_eq!(job.status, JobStatus::Completed);

    let call = harness.generator.call_for("twitter").unwrap();
    assert_eq!(call.prompt.as_deref(), Some("GLOBAL\n\nTWITTER"));

    let history = harness
        .manager
        .get_content_history(Some("alice"), None)
        .await
        .unwrap();
    let detail = &history[0].used_prompts["twitter"];
    assert!(detail.global_source.is_fallback());
    assert!(detail.platform_source.is_fallback());
}

#[tokio::test]
async fn test_validation_rejects_incomplete_submissions() {
    let harness = Harness::new(ScriptedGenerator::new());

    let err = harness
        .manager
        .create_jobs(text_submission("Hello", &[]))
        .await
        .unwrap_err();
    assert_eq!(job_error(&err), Some(&JobErrorKind::NoTargets));

    let err = harness
        .manager
        .create_jobs(text_submission("   ", &["twitter"]))
        .await
        .unwrap_err();
    assert!(matches!(
        job_error(&err),
        Some(JobErrorKind::MissingContent(_))
    ));

    let no_upload = repurpose_core::JobSubmission::builder()
        .source_type(SourceType::Audio)
        .targets(strings(&["blog"]))
        .build()
        .unwrap();
    let err = harness.manager.create_jobs(no_upload).await.unwrap_err();
    assert!(matches!(
        job_error(&err),
        Some(JobErrorKind::MissingContent(_))
    ));

    assert!(harness.jobs.is_empty().await);
    assert!(harness.requests.is_empty().await);
}

#[tokio::test]
async fn test_status_never_leaves_terminal_state() {
    let harness = Harness::new(ScriptedGenerator::new());

    let job = harness.run(text_submission("Hello", &["twitter"])).await;
    assert_eq!(job.status, JobStatus::Completed);

    let err = harness.manager.process_job(&job.id).await.unwrap_err();
    assert!(matches!(
        job_error(&err),
        Some(JobErrorKind::InvalidTransition { .. })
    ));

    let err = harness
        .manager
        .update_job_status(&job.id, JobStatus::Failed, Some("late".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        job_error(&err),
        Some(JobErrorKind::InvalidTransition { .. })
    ));

    let stored = harness.manager.get_job(&job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert!(stored.error.is_none());
    assert_eq!(harness.generator.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_processing_runs_job_once() {
    let harness = Harness::new(ScriptedGenerator::new());

    let handles = harness
        .manager
        .create_jobs(text_submission("Hello", &["twitter", "threads"]))
        .await
        .unwrap();
    let job_id = handles[0].job_id.clone();

    let (first, second) = tokio::join!(
        harness.manager.process_job(&job_id),
        harness.manager.process_job(&job_id)
    );

    let outcomes = [first, second];
    let completed = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(completed, 1);
    assert_eq!(harness.generator.calls().len(), 2);
}

#[tokio::test]
async fn test_process_unknown_job_is_not_found() {
    let harness = Harness::new(ScriptedGenerator::new());

    let err = harness.manager.process_job("no-such-job").await.unwrap_err();
    assert_eq!(
        job_error(&err),
        Some(&JobErrorKind::NotFound("no-such-job".to_string()))
    );
    assert!(harness.manager.get_job("no-such-job").await.unwrap().is_none());
}

#[tokio::test]
async fn test_submit_processes_in_background() {
    let harness = Harness::new(ScriptedGenerator::new());

    let (handles, task) = harness
        .manager
        .submit(text_submission("Hello", &["twitter", "linkedin"]))
        .await
        .unwrap();
    assert_eq!(handles.len(), 2);

    let job = JobManager::join(task).await.unwrap();
    assert_eq!(job.id, handles[0].job_id);
    assert_eq!(job.status, JobStatus::Completed);
}

struct PanickingDefaults;

impl DefaultPrompts for PanickingDefaults {
    fn global_prompt(&self) -> String {
        panic!("prompt table corrupted")
    }

    fn platform_prompt(&self, _platform: Platform) -> String {
        String::new()
    }
}

#[tokio::test]
async fn test_worker_panic_fails_job() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.default_prompts(Arc::new(PanickingDefaults))
    });

    let handles = harness
        .manager
        .create_jobs(text_submission("Hello", &["twitter"]))
        .await
        .unwrap();
    let job_id = handles[0].job_id.clone();

    let err = JobManager::join(harness.manager.spawn_job(job_id.clone()))
        .await
        .unwrap_err();
    match job_error(&err) {
        Some(JobErrorKind::WorkerPanicked(reason)) => {
            assert!(reason.contains("prompt table corrupted"))
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let job = harness.manager.get_job(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.unwrap().contains("prompt table corrupted"));
}

fn history_record(id: &str, user: Option<&str>, seconds: i64) -> ContentMetadata {
    ContentMetadata {
        id: id.to_string(),
        job_id: format!("job-{}", id),
        source_type: SourceType::Text,
        user_id: user.map(str::to_string),
        created_at: chrono::DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap(),
        source_text: Some("text".to_string()),
        file_info: None,
        preview: None,
        generated_content: Vec::new(),
        used_prompts: BTreeMap::new(),
    }
}

#[tokio::test]
async fn test_content_history_filters_sorts_and_limits() {
    let harness = Harness::with(ScriptedGenerator::new(), |builder| {
        builder.config(PipelineConfig {
            history_limit: 2,
            generation_timeout_secs: None,
        })
    });

    for record in [
        history_record("a", Some("alice"), 10),
        history_record("b", Some("bob"), 20),
        history_record("c", Some("alice"), 30),
        history_record("d", Some("alice"), 5),
        history_record("e", None, 40),
    ] {
        harness.history.save(&record).await.unwrap();
    }

    let ids = |records: Vec<ContentMetadata>| -> Vec<String> {
        records.into_iter().map(|r| r.id).collect()
    };

    let alice = harness
        .manager
        .get_content_history(Some("alice"), Some(10))
        .await
        .unwrap();
    assert_eq!(ids(alice), vec!["c", "a", "d"]);

    let everyone = harness.manager.get_content_history(None, None).await.unwrap();
    assert_eq!(ids(everyone), vec!["e", "c"]);

    let nobody = harness
        .manager
        .get_content_history(Some("carol"), None)
        .await
        .unwrap();
    assert!(nobody.is_empty());
}

#[test]
fn test_builder_names_missing_collaborator() {
    let Err(err) = JobManager::builder().build() else {
        panic!("builder without stores should fail");
    };
    match err.kind() {
        RepurposeErrorKind::Builder(e) => {
            assert_eq!(e.kind(), &BuilderErrorKind::MissingField("jobs".to_string()))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
