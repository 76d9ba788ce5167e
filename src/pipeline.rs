use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::download::{sanitize_filename, AudioFetcher, AudioFetcherFactory};
use crate::error::{Result, SublateError};
use crate::model::{HardwareProfile, MemoryThresholdPolicy, ModelSelectionPolicy};
use crate::subtitle::SubtitleDocument;
use crate::transcribe::{Transcriber, TranscriberFactory};
use crate::translate::{self, chunk_texts, realign, TranslateBackend};

const AUDIO_EXTENSIONS: [&str; 7] = ["m4a", "mp3", "wav", "flac", "ogg", "aac", "opus"];

/// Pipeline stage. Transitions are linear; `Failed` is terminal and
/// reachable from any stage on unrecoverable collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Transcribing,
    Assembling,
    Translating,
    Realigning,
    Serializing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Transcribing => "transcribing",
            Stage::Assembling => "assembling",
            Stage::Translating => "translating",
            Stage::Realigning => "realigning",
            Stage::Serializing => "serializing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Sequences transcription, assembly, chunking, translation, realignment and
/// serialization. Single-threaded and sequential; each stage fully consumes
/// its input before the next begins. No retries at this layer.
pub struct Pipeline {
    config: Config,
    fetcher: Box<dyn AudioFetcher>,
    transcriber: Box<dyn Transcriber>,
    backend: Option<Box<dyn TranslateBackend>>,
    stage: Stage,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = AudioFetcherFactory::create_fetcher(config.download.clone());
        let transcriber = TranscriberFactory::create_default(config.transcriber.clone());

        // Check dependencies up front
        fetcher.check_availability()?;

        Ok(Self {
            config,
            fetcher,
            transcriber,
            backend: None,
            stage: Stage::Idle,
        })
    }

    /// Construct with explicit collaborators, bypassing the availability
    /// checks. A translation backend supplied here is used as-is instead of
    /// the model-selection path.
    pub fn with_collaborators(
        config: Config,
        fetcher: Box<dyn AudioFetcher>,
        transcriber: Box<dyn Transcriber>,
        backend: Option<Box<dyn TranslateBackend>>,
    ) -> Self {
        Self {
            config,
            fetcher,
            transcriber,
            backend,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        info!("Pipeline stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Run the full pipeline on a media URL or local audio file. Returns the
    /// path of the translated subtitle file.
    pub async fn process(
        &mut self,
        input: &str,
        output_dir: &Path,
        target_language: Option<&str>,
    ) -> Result<PathBuf> {
        self.stage = Stage::Idle;
        match self.run_process(input, output_dir, target_language).await {
            Ok(path) => {
                self.advance(Stage::Done);
                Ok(path)
            }
            Err(e) => {
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_process(
        &mut self,
        input: &str,
        output_dir: &Path,
        target_language: Option<&str>,
    ) -> Result<PathBuf> {
        let audio_path = self.resolve_audio(input).await?;
        tokio::fs::create_dir_all(output_dir).await?;

        self.advance(Stage::Transcribing);
        let source_language = self.config.transcriber.language.clone();
        let transcript = self
            .transcriber
            .transcribe(&audio_path, Some(&source_language))
            .await?;

        self.advance(Stage::Assembling);
        let document = SubtitleDocument::from_segments(&transcript.segments);
        info!("Assembled {} timed entries", document.len());

        let stem = audio_path
            .file_stem()
            .map(|s| sanitize_filename(&s.to_string_lossy()))
            .ok_or_else(|| SublateError::Config("Invalid audio filename".to_string()))?;

        let source_srt = output_dir.join(format!("{}.{}.srt", stem, source_language));
        document.write_srt_file(&source_srt).await?;

        let target_language = target_language
            .unwrap_or(&self.config.translate.target_language)
            .to_string();
        let translated = self.translate_document(&document, &target_language).await?;

        self.advance(Stage::Serializing);
        let target_srt = output_dir.join(format!("{}.{}.srt", stem, target_language));
        translated.write_srt_file(&target_srt).await?;

        Ok(target_srt)
    }

    /// Run the full pipeline on every audio file in a directory. Failures
    /// are logged per file and do not abort the batch.
    pub async fn process_directory(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        target_language: Option<&str>,
    ) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(SublateError::Config(
                "Input path is not a directory".to_string(),
            ));
        }

        let mut audio_files = Vec::new();
        for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
            if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
                if AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    audio_files.push(entry.path().to_path_buf());
                }
            }
        }

        info!("Found {} audio files to process", audio_files.len());

        for audio_path in audio_files {
            let input = audio_path.to_string_lossy().to_string();
            match self.process(&input, output_dir, target_language).await {
                Ok(path) => info!("Successfully processed {} -> {}", input, path.display()),
                Err(e) => warn!("Failed to process {}: {}", input, e),
            }
        }

        Ok(())
    }

    /// Download audio from a media URL without transcribing
    pub async fn download(&self, url: &str, output_dir: &Path) -> Result<PathBuf> {
        self.fetcher.fetch_audio(url, output_dir).await
    }

    /// Transcribe an audio file and write the subtitles, no translation
    pub async fn transcribe_audio(
        &mut self,
        audio_path: &Path,
        output_path: &Path,
        language: Option<&str>,
    ) -> Result<()> {
        self.stage = Stage::Idle;
        let result = self.run_transcribe(audio_path, output_path, language).await;
        match result {
            Ok(()) => {
                self.advance(Stage::Done);
                Ok(())
            }
            Err(e) => {
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_transcribe(
        &mut self,
        audio_path: &Path,
        output_path: &Path,
        language: Option<&str>,
    ) -> Result<()> {
        self.advance(Stage::Transcribing);
        let transcript = self.transcriber.transcribe(audio_path, language).await?;

        self.advance(Stage::Assembling);
        let document = SubtitleDocument::from_segments(&transcript.segments);

        self.advance(Stage::Serializing);
        document.write_srt_file(output_path).await
    }

    /// Translate an existing subtitle file, preserving timings and entry
    /// count
    pub async fn translate_subtitle_file(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        target_language: Option<&str>,
    ) -> Result<()> {
        self.stage = Stage::Idle;
        let result = self
            .run_translate_file(input_path, output_path, target_language)
            .await;
        match result {
            Ok(()) => {
                self.advance(Stage::Done);
                Ok(())
            }
            Err(e) => {
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    async fn run_translate_file(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        target_language: Option<&str>,
    ) -> Result<()> {
        let document = SubtitleDocument::read_srt_file(input_path).await?;
        let target_language = target_language
            .unwrap_or(&self.config.translate.target_language)
            .to_string();

        let translated = self.translate_document(&document, &target_language).await?;

        self.advance(Stage::Serializing);
        translated.write_srt_file(output_path).await
    }

    /// Chunk, translate and realign a document. The entry count invariant
    /// holds unconditionally: the result has exactly as many entries as the
    /// input, with original timings.
    async fn translate_document(
        &mut self,
        document: &SubtitleDocument,
        target_language: &str,
    ) -> Result<SubtitleDocument> {
        self.advance(Stage::Translating);
        self.ensure_backend().await?;
        let backend = self
            .backend
            .as_deref()
            .ok_or_else(|| SublateError::Translation("No translation backend".to_string()))?;

        let texts = document.texts();
        let chunks = chunk_texts(&texts, self.config.translate.chunk_char_limit);
        info!(
            "Chunked {} entries into {} translation units",
            texts.len(),
            chunks.len()
        );

        let translated_chunks =
            translate::translate_chunks(backend, &chunks, target_language).await?;

        self.advance(Stage::Realigning);
        let entries = realign(
            &translated_chunks,
            &document.entries,
            &self.config.translate.sentence_delimiter,
        );

        Ok(SubtitleDocument { entries })
    }

    async fn ensure_backend(&mut self) -> Result<()> {
        if self.backend.is_some() {
            return Ok(());
        }

        let profile = HardwareProfile::from_config(&self.config.model);
        let policy = MemoryThresholdPolicy::new(&self.config.model);
        let choice = policy.select(&profile);

        let backend = translate::create_backend(
            &self.config.translate,
            &choice,
            &self.config.model.fallback_model,
        )
        .await?;

        self.backend = Some(backend);
        Ok(())
    }

    async fn resolve_audio(&self, input: &str) -> Result<PathBuf> {
        if input.starts_with("http://") || input.starts_with("https://") {
            let audio_dir = PathBuf::from(&self.config.download.audio_dir);
            self.fetcher.fetch_audio(input, &audio_dir).await
        } else {
            let path = PathBuf::from(input);
            if !path.exists() {
                return Err(SublateError::FileNotFound(path.display().to_string()));
            }
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::{Transcript, TranscriptSegment};
    use async_trait::async_trait;

    struct UnusedFetcher;

    #[async_trait]
    impl AudioFetcher for UnusedFetcher {
        async fn fetch_audio(&self, _url: &str, _output_dir: &Path) -> Result<PathBuf> {
            Err(SublateError::Download("not available in tests".to_string()))
        }

        fn check_availability(&self) -> Result<()> {
            Ok(())
        }
    }

    struct FixedTranscriber {
        segments: Vec<TranscriptSegment>,
    }

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _language: Option<&str>,
        ) -> Result<Transcript> {
            Ok(Transcript {
                segments: self.segments.clone(),
                language: "ja".to_string(),
            })
        }
    }

    struct FailingTranscriber;

    #[async_trait]
    impl Transcriber for FailingTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _language: Option<&str>,
        ) -> Result<Transcript> {
            Err(SublateError::Transcriber("backend exploded".to_string()))
        }
    }

    struct FixedBackend {
        response: String,
    }

    #[async_trait]
    impl TranslateBackend for FixedBackend {
        async fn translate_chunk(
            &self,
            _chunk: &str,
            _target_language: Option<&str>,
        ) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment {
                start: 0.0,
                end: 2.0,
                text: "こんにちは。".to_string(),
            },
            TranscriptSegment {
                start: 2.5,
                end: 4.0,
                text: "元気ですか。".to_string(),
            },
            TranscriptSegment {
                start: 4.5,
                end: 6.0,
                text: "さようなら。".to_string(),
            },
        ]
    }

    fn pipeline(
        transcriber: Box<dyn Transcriber>,
        backend: Option<Box<dyn TranslateBackend>>,
    ) -> Pipeline {
        Pipeline::with_collaborators(
            Config::default(),
            Box::new(UnusedFetcher),
            transcriber,
            backend,
        )
    }

    #[tokio::test]
    async fn test_process_local_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("talk.wav");
        std::fs::write(&audio, b"fake audio").unwrap();
        let out_dir = dir.path().join("subs");

        let mut pipeline = pipeline(
            Box::new(FixedTranscriber {
                segments: segments(),
            }),
            Some(Box::new(FixedBackend {
                response: "안녕하세요. 잘 지내요. 안녕히 가세요".to_string(),
            })),
        );

        let target_srt = pipeline
            .process(&audio.to_string_lossy(), &out_dir, Some("ko"))
            .await
            .unwrap();

        assert_eq!(pipeline.stage(), Stage::Done);
        assert!(out_dir.join("talk.ja.srt").exists());
        assert!(target_srt.exists());

        let translated = SubtitleDocument::read_srt_file(&target_srt).await.unwrap();
        assert_eq!(translated.len(), 3);
        assert_eq!(translated.entries[0].text, "안녕하세요");
        assert_eq!(translated.entries[1].text, "잘 지내요");
        assert_eq!(translated.entries[2].text, "안녕히 가세요");
        // Timing preserved from transcription
        assert_eq!(translated.entries[0].start_ms, 0);
        assert_eq!(translated.entries[1].start_ms, 2500);
        assert_eq!(translated.entries[2].end_ms, 6000);
    }

    #[tokio::test]
    async fn test_transcriber_failure_reaches_failed_stage() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("talk.wav");
        std::fs::write(&audio, b"fake audio").unwrap();

        let mut pipeline = pipeline(Box::new(FailingTranscriber), None);

        let result = pipeline
            .process(&audio.to_string_lossy(), dir.path(), Some("ko"))
            .await;

        assert!(result.is_err());
        assert_eq!(pipeline.stage(), Stage::Failed);
    }

    #[tokio::test]
    async fn test_missing_input_file_is_fatal() {
        let mut pipeline = pipeline(
            Box::new(FixedTranscriber {
                segments: segments(),
            }),
            None,
        );

        let result = pipeline
            .process("/does/not/exist.wav", Path::new("subs"), None)
            .await;

        assert!(matches!(result, Err(SublateError::FileNotFound(_))));
        assert_eq!(pipeline.stage(), Stage::Failed);
    }

    #[tokio::test]
    async fn test_translate_file_shortfall_keeps_entry_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.srt");
        let output = dir.path().join("out.srt");

        let source = "1\n00:00:00,000 --> 00:00:02,000\n一行目。\n\n\
                      2\n00:00:02,500 --> 00:00:04,000\n二行目。\n\n\
                      3\n00:00:04,500 --> 00:00:06,000\n三行目。\n";
        std::fs::write(&input, source).unwrap();

        // Backend yields only two fragments for three entries
        let mut pipeline = pipeline(
            Box::new(FixedTranscriber { segments: vec![] }),
            Some(Box::new(FixedBackend {
                response: "first line. second line".to_string(),
            })),
        );

        pipeline
            .translate_subtitle_file(&input, &output, Some("en"))
            .await
            .unwrap();

        assert_eq!(pipeline.stage(), Stage::Done);
        let translated = SubtitleDocument::read_srt_file(&output).await.unwrap();
        assert_eq!(translated.len(), 3);
        assert_eq!(translated.entries[0].text, "first line");
        assert_eq!(translated.entries[1].text, "second line");
        // Third entry keeps the original text and timing
        assert_eq!(translated.entries[2].text, "三行目。");
        assert_eq!(translated.entries[2].start_ms, 4500);
    }
}
