use super::Composer;
use crate::core::error::AssistantError;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Callback surface of a speech recognizer, delivered in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    Started,
    Result { text: String, is_final: bool },
    Error(String),
    Ended,
}

/// Speech-to-text engine. Capture happens elsewhere; the composer only sees
/// the events a recognizer reports through [`Recognizer::poll`].
pub trait Recognizer {
    fn start(&mut self) -> Result<(), AssistantError>;
    fn stop(&mut self);
    fn poll(&mut self) -> Vec<DictationEvent>;
}

pub fn error_message(code: &str) -> String {
    match code {
        "not-allowed" => {
            "Microphone access denied. Please allow microphone access and try again.".to_string()
        }
        "no-speech" => "No speech detected. Please speak clearly and try again.".to_string(),
        "audio-capture" => {
            "Audio capture failed. Please check your microphone and try again.".to_string()
        }
        other => format!("Voice input error: {}", other),
    }
}

/// Holds the one recognizer allowed to be active at a time.
#[derive(Default)]
pub struct DictationController {
    active: Option<Box<dyn Recognizer>>,
}

impl DictationController {
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start `recognizer`, stopping whichever one was active before.
    pub fn start(&mut self, mut recognizer: Box<dyn Recognizer>, composer: &mut Composer) -> bool {
        if self.is_recording() {
            debug!("replacing active recognizer");
            self.stop(composer);
        }
        match recognizer.start() {
            Ok(()) => {
                self.active = Some(recognizer);
                true
            }
            Err(err) => {
                let detail = match err {
                    AssistantError::Dictation(detail) => detail,
                    other => other.to_string(),
                };
                warn!(%detail, "recognizer failed to start");
                composer.append_error(&format!("Failed to start voice recording: {}", detail));
                false
            }
        }
    }

    pub fn stop(&mut self, composer: &mut Composer) {
        if let Some(mut recognizer) = self.active.take() {
            recognizer.stop();
        }
        composer.end_dictation();
    }

    /// Apply pending recognizer events to the composer. Returns whether the
    /// recognizer is still active afterwards.
    pub fn pump(&mut self, composer: &mut Composer) -> bool {
        let Some(recognizer) = self.active.as_mut() else {
            return false;
        };
        for event in recognizer.poll() {
            match event {
                DictationEvent::Started => composer.begin_dictation(),
                DictationEvent::Result { text, is_final } => {
                    composer.dictation_result(&text, is_final)
                }
                DictationEvent::Error(code) => {
                    warn!(%code, "dictation error");
                    composer.end_dictation();
                    composer.append_error(&error_message(&code));
                    self.active = None;
                    break;
                }
                DictationEvent::Ended => {
                    debug!("dictation ended");
                    composer.end_dictation();
                    self.active = None;
                    break;
                }
            }
        }
        self.is_recording()
    }
}

/// Recognizer that replays a typed transcript word by word, for terminals
/// without audio capture.
pub struct TranscriptRecognizer {
    words: Vec<String>,
    pending: VecDeque<DictationEvent>,
}

impl TranscriptRecognizer {
    pub fn new(transcript: &str) -> Self {
        Self {
            words: transcript.split_whitespace().map(str::to_string).collect(),
            pending: VecDeque::new(),
        }
    }
}

impl Recognizer for TranscriptRecognizer {
    fn start(&mut self) -> Result<(), AssistantError> {
        if self.words.is_empty() {
            return Err(AssistantError::Dictation("empty transcript".to_string()));
        }
        self.pending.push_back(DictationEvent::Started);
        for end in 1..self.words.len() {
            self.pending.push_back(DictationEvent::Result {
                text: self.words[..end].join(" "),
                is_final: false,
            });
        }
        self.pending.push_back(DictationEvent::Result {
            text: self.words.join(" "),
            is_final: true,
        });
        self.pending.push_back(DictationEvent::Ended);
        Ok(())
    }

    fn stop(&mut self) {
        self.pending.clear();
    }

    fn poll(&mut self) -> Vec<DictationEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct ScriptedRecognizer {
        events: Vec<DictationEvent>,
        fail_start: bool,
        stopped: Arc<Mutex<bool>>,
    }

    impl ScriptedRecognizer {
        fn new(events: Vec<DictationEvent>) -> (Box<Self>, Arc<Mutex<bool>>) {
            let stopped = Arc::new(Mutex::new(false));
            let recognizer = Box::new(Self {
                events,
                fail_start: false,
                stopped: Arc::clone(&stopped),
            });
            (recognizer, stopped)
        }
    }

    impl Recognizer for ScriptedRecognizer {
        fn start(&mut self) -> Result<(), AssistantError> {
            if self.fail_start {
                return Err(AssistantError::Dictation("NotAllowedError".to_string()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            *self.stopped.lock().unwrap() = true;
        }

        fn poll(&mut self) -> Vec<DictationEvent> {
            std::mem::take(&mut self.events)
        }
    }

    #[test]
    fn error_codes_map_to_readable_messages() {
        assert!(error_message("not-allowed").starts_with("Microphone access denied."));
        assert!(error_message("no-speech").starts_with("No speech detected."));
        assert!(error_message("audio-capture").starts_with("Audio capture failed."));
        assert_eq!(error_message("network"), "Voice input error: network");
    }

    #[test]
    fn final_result_lands_in_the_buffer() {
        let mut composer = Composer::default();
        composer.set_text("Please");
        let mut dictation = DictationController::default();
        let (recognizer, _) = ScriptedRecognizer::new(vec![
            DictationEvent::Started,
            DictationEvent::Result {
                text: "sort".to_string(),
                is_final: false,
            },
        ]);

        assert!(dictation.start(recognizer, &mut composer));
        assert!(dictation.pump(&mut composer));
        assert_eq!(composer.display_text(), "Please\n🎤 Recording... sort");

        composer.dictation_result("sort the list", true);
        assert_eq!(composer.text(), "Please sort the list");
        assert_eq!(composer.display_text(), "Please sort the list\n🎤 Recording... ");
    }

    #[test]
    fn error_removes_the_marker_and_reports() {
        let mut composer = Composer::default();
        let mut dictation = DictationController::default();
        let (recognizer, _) = ScriptedRecognizer::new(vec![
            DictationEvent::Started,
            DictationEvent::Error("no-speech".to_string()),
        ]);

        dictation.start(recognizer, &mut composer);
        assert!(!dictation.pump(&mut composer));
        assert!(!dictation.is_recording());
        assert_eq!(
            composer.display_text(),
            "\n❌ No speech detected. Please speak clearly and try again."
        );
    }

    #[test]
    fn starting_a_second_recognizer_stops_the_first() {
        let mut composer = Composer::default();
        let mut dictation = DictationController::default();
        let (first, first_stopped) = ScriptedRecognizer::new(vec![DictationEvent::Started]);
        let (second, second_stopped) = ScriptedRecognizer::new(vec![]);

        dictation.start(first, &mut composer);
        dictation.pump(&mut composer);
        dictation.start(second, &mut composer);

        assert!(*first_stopped.lock().unwrap());
        assert!(!*second_stopped.lock().unwrap());
        assert!(dictation.is_recording());
        assert!(!composer.display_text().contains("Recording"));
    }

    #[test]
    fn start_failure_is_appended_to_the_buffer() {
        let mut composer = Composer::default();
        let mut dictation = DictationController::default();
        let (mut recognizer, _) = ScriptedRecognizer::new(vec![]);
        recognizer.fail_start = true;

        assert!(!dictation.start(recognizer, &mut composer));
        assert!(!dictation.is_recording());
        assert_eq!(
            composer.text(),
            "\n❌ Failed to start voice recording: NotAllowedError"
        );
    }

    #[test]
    fn transcript_recognizer_replays_words_then_ends() {
        let mut composer = Composer::default();
        let mut dictation = DictationController::default();

        dictation.start(Box::new(TranscriptRecognizer::new("reverse a string")), &mut composer);
        assert!(!dictation.pump(&mut composer));
        assert_eq!(composer.text(), "reverse a string");
        assert_eq!(composer.display_text(), "reverse a string");
    }
}
