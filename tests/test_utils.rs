// Test utilities and common constants
//
// This file provides shared helpers used across multiple test files.
// Test audio is synthesised and written to temporary directories instead of
// being checked in, so every test states exactly what signal it analyses.
//
// The utilities include:
// - Constants for the synthesised test signals
// - Helpers writing sine and silent WAV files with hound
// - A fake text generator for the generative strategy
// - A one-shot local HTTP server standing in for the chat-completions API

#![allow(dead_code)]

use compressor_advisor::recommend::{RecommendError, TextGenerator};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::cell::RefCell;
use std::f32::consts::PI;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Constants for synthesised signals
pub const SAMPLE_RATE: u32 = 22050;
pub const SINE_FREQ: f32 = 441.0;
pub const SINE_SECONDS: f32 = 1.0;

/// Write a 16-bit sine WAV file with the same signal on every channel.
///
/// # Returns
/// * `PathBuf` - The path of the written file
pub fn write_sine_wav(
    dir: &Path,
    name: &str,
    freq: f32,
    amplitude: f32,
    sample_rate: u32,
    channels: u16,
) -> PathBuf {
    let path = dir.join(name);
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).expect("Failed to create WAV file");
    let frames = (sample_rate as f32 * SINE_SECONDS) as usize;
    for i in 0..frames {
        let value = amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin();
        let sample = (value * i16::MAX as f32).round() as i16;
        for _ in 0..channels {
            writer.write_sample(sample).expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize WAV file");
    path
}

/// Write a 32-bit float WAV file containing only zeros.
pub fn write_silent_wav(dir: &Path, name: &str, frames: usize) -> PathBuf {
    let path = dir.join(name);
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec).expect("Failed to create WAV file");
    for _ in 0..frames {
        writer.write_sample(0.0f32).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV file");
    path
}

/// Text generator returning a canned response and remembering the prompts it saw.
pub struct FakeGenerator {
    pub response: String,
    pub prompts: RefCell<Vec<(String, String)>>,
}

impl FakeGenerator {
    pub fn new(response: &str) -> Self {
        FakeGenerator {
            response: response.to_string(),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl TextGenerator for FakeGenerator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RecommendError> {
        self.prompts
            .borrow_mut()
            .push((system.to_string(), prompt.to_string()));
        Ok(self.response.clone())
    }
}

/// Request seen by [`spawn_chat_server`]
pub struct CapturedRequest {
    pub request_line: String,
    /// Header lines as sent, names not normalised
    pub headers: Vec<String>,
    pub body: String,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}

/// Serve exactly one HTTP request on a local port with a canned reply.
///
/// # Returns
/// * `String` - Endpoint URL to point the client at
/// * `JoinHandle` - Yields the captured request once it was answered
pub fn spawn_chat_server(status: u16, body: &str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let port = listener.local_addr().expect("No local address").port();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("Failed to accept connection");
        let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("Failed to read request line");

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("Failed to read header");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            headers.push(line);
        }

        let mut captured = CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::new(),
        };
        let length: usize = captured
            .header("content-length")
            .and_then(|value| value.parse().ok())
            .unwrap_or(0);
        let mut raw_body = vec![0u8; length];
        reader.read_exact(&mut raw_body).expect("Failed to read body");
        captured.body = String::from_utf8(raw_body).expect("Body is not UTF-8");

        let reason = if status < 400 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        stream
            .write_all(response.as_bytes())
            .expect("Failed to write response");
        stream.flush().expect("Failed to flush response");
        captured
    });

    (format!("http://127.0.0.1:{}/v1/chat/completions", port), handle)
}

/// Test that verifies the helpers produce readable files.
#[test]
fn test_validate_test_environment() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_sine_wav(dir.path(), "sine.wav", SINE_FREQ, 0.5, SAMPLE_RATE, 1);
    let reader = hound::WavReader::open(&path).expect("Failed to reopen WAV file");
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
    assert_eq!(reader.len() as usize, (SAMPLE_RATE as f32 * SINE_SECONDS) as usize);
}
