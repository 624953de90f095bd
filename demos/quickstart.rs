//! Quick-start examples for the RoEx Rust SDK.
//!
//! Run with:
//!   ROEX_API_KEY=... cargo run --example quickstart -- vocals.wav drums.wav bass.wav
//!
//! Set `RUST_LOG=roex=debug` to watch the polling.

use std::time::Duration;

use roex::models::analysis::{AnalysisMusicalStyle, MixAnalysisRequest};
use roex::models::common::{DesiredLoudness, InstrumentGroup, MusicalStyle};
use roex::models::mastering::MasteringRequest;
use roex::models::mixing::{
    Compression, EqSettings, FinalMixRequestAdvanced, MultitrackMixRequest, Panning,
    TrackData, TrackEffectsData,
};
use roex::{ClientBuilder, RetryPolicy};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> roex::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "roex=info".into()))
        .init();

    let stems: Vec<String> = std::env::args().skip(1).collect();

    // -----------------------------------------------------------------------
    // 1. Create a client (reads ROEX_API_KEY from environment)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::new().timeout(Duration::from_secs(120)).build()?;
    println!("API status: {}", client.health_check().await?);

    // -----------------------------------------------------------------------
    // 2. Upload the stems
    // -----------------------------------------------------------------------
    let mut urls = Vec::with_capacity(stems.len());
    for stem in &stems {
        let url = client.upload_file(stem).await?;
        println!("Uploaded {stem} -> {url}");
        urls.push(url);
    }

    // -----------------------------------------------------------------------
    // 3. Mix preview, then a final mix with per-track effects
    // -----------------------------------------------------------------------
    let groups = [
        InstrumentGroup::VocalGroup,
        InstrumentGroup::DrumsGroup,
        InstrumentGroup::BassGroup,
    ];
    let tracks = urls
        .iter()
        .zip(groups.iter().cycle())
        .map(|(url, group)| TrackData::new(url.clone(), *group))
        .collect();
    let request = MultitrackMixRequest::new(tracks, MusicalStyle::Pop)?;

    let task = client.create_mix_preview(&request).await?;
    let preview = client.retrieve_preview_mix(&task.id, true, None).await?;
    println!("Preview mix: {:?}", preview.download_url());

    let effects = urls
        .iter()
        .enumerate()
        .map(|(i, url)| TrackEffectsData {
            track_url: url.clone(),
            gain_db: if i == 0 { 1.5 } else { 0.0 },
            panning_settings: Some(if i % 2 == 0 {
                Panning::center()
            } else {
                Panning::slight_left()
            }),
            eq_settings: Some(if i == 0 {
                EqSettings::vocal_clarity()
            } else {
                EqSettings::high_pass()
            }),
            compression_settings: Some(Compression::gentle()),
        })
        .collect();
    let mut final_request = FinalMixRequestAdvanced::new(task.id.clone(), effects);
    final_request.create_master = true;
    final_request.desired_loudness = Some(DesiredLoudness::Medium);

    let final_mix = client.retrieve_final_mix_advanced(&final_request).await?;
    let Some(mix_url) = final_mix.download_url().map(str::to_string) else {
        println!("Final mix came back without a download URL: {final_mix:?}");
        return Ok(());
    };
    client.download_file(&mix_url, "out/final_mix.wav").await?;
    println!("Final mix saved to out/final_mix.wav");

    // -----------------------------------------------------------------------
    // 4. Master the mix with a more patient polling budget
    // -----------------------------------------------------------------------
    let mastering = MasteringRequest::new(mix_url.clone(), MusicalStyle::Pop, DesiredLoudness::High);
    let task = client.create_mastering_preview(&mastering).await?;
    let patient = RetryPolicy::fixed(Duration::from_secs(10), 60);
    client.retrieve_preview_master(&task.id, Some(patient)).await?;

    let master = client.retrieve_final_master(&task.id).await?;
    if let Some(url) = master.download_url() {
        let bytes = client.download_file(url, "out/final_master.wav").await?;
        println!("Master saved ({bytes} bytes)");
    }

    // -----------------------------------------------------------------------
    // 5. Analyse the mix
    // -----------------------------------------------------------------------
    let analysis = client
        .analyze_mix(&MixAnalysisRequest {
            audio_file_location: mix_url,
            musical_style: AnalysisMusicalStyle::Pop,
            is_master: false,
        })
        .await?;
    println!("Loudness: {}", analysis["payload"]["integrated_loudness_lufs"]);

    Ok(())
}
