/*!
 * Speech-to-segments collaborators.
 *
 * Everything here wraps external programs; none of it is needed when the
 * input is already a transcript.
 *
 * - `process`: Running external executables with a timeout
 * - `audio`: Audio track extraction from video containers via ffmpeg
 * - `whisper`: Speech recognition via the Whisper command-line tool
 * - `transcript`: Whisper JSON transcript model
 */

pub mod audio;
pub mod process;
pub mod transcript;
pub mod whisper;

// Re-export main types
pub use audio::AudioExtractor;
pub use transcript::Transcript;
pub use whisper::WhisperTranscriber;
