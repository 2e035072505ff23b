//! Microphone capture through WebAudio.
//!
//! The analyser is polled synchronously once per frame; until the user grants
//! access the frame loop runs with no signal.

use trail_core::constants::SPECTRUM_BINS;
use trail_core::{AudioLevels, BandRange, LevelSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// fftSize 512 gives 256 frequency bins.
pub const FFT_SIZE: u32 = (SPECTRUM_BINS * 2) as u32;

pub struct MicLevels {
    // kept alive so the graph is not collected
    _audio_ctx: web::AudioContext,
    _source: web::MediaStreamAudioSourceNode,
    analyser: web::AnalyserNode,
    spectrum: Vec<u8>,
    bass_band: BandRange,
    treble_band: BandRange,
}

impl MicLevels {
    pub fn set_bands(&mut self, bass_band: BandRange, treble_band: BandRange) {
        self.bass_band = bass_band;
        self.treble_band = treble_band;
    }
}

impl LevelSource for MicLevels {
    fn poll_levels(&mut self) -> Option<AudioLevels> {
        self.analyser.get_byte_frequency_data(&mut self.spectrum);
        Some(AudioLevels::from_spectrum(
            &self.spectrum,
            self.bass_band,
            self.treble_band,
        ))
    }
}

fn js_err(context: &str, e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}: {:?}", context, e)
}

/// Ask for the microphone and wire it into an analyser.
pub async fn start_microphone(
    bass_band: BandRange,
    treble_band: BandRange,
) -> anyhow::Result<MicLevels> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| js_err("mediaDevices unavailable", e))?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&JsValue::TRUE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| js_err("getUserMedia failed", e))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| js_err("microphone denied", e))?
        .dyn_into()
        .map_err(|e| js_err("not a MediaStream", e))?;

    let audio_ctx = web::AudioContext::new().map_err(|e| js_err("AudioContext error", e))?;
    if let Ok(resume) = audio_ctx.resume() {
        let _ = JsFuture::from(resume).await;
    }
    let source = audio_ctx
        .create_media_stream_source(&stream)
        .map_err(|e| js_err("MediaStreamSource error", e))?;
    let analyser = audio_ctx
        .create_analyser()
        .map_err(|e| js_err("AnalyserNode error", e))?;
    analyser.set_fft_size(FFT_SIZE);
    source
        .connect_with_audio_node(&analyser)
        .map_err(|e| js_err("connect error", e))?;

    let bins = analyser.frequency_bin_count() as usize;
    log::info!("[audio] microphone live, {} bins", bins);
    Ok(MicLevels {
        _audio_ctx: audio_ctx,
        _source: source,
        analyser,
        spectrum: vec![0; bins],
        bass_band,
        treble_band,
    })
}
