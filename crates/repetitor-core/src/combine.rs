use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use tokio::process::Command;

use crate::error::{RepetitorError, Result};

/// Arguments for the ffmpeg mux: copy the video stream untouched, re-encode
/// audio to AAC, stop at the shorter input, overwrite any existing output.
pub fn mux_args(video: &Path, audio: &Path, dest: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.as_os_str().to_os_string(),
        "-i".into(),
        audio.as_os_str().to_os_string(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-shortest".into(),
        dest.as_os_str().to_os_string(),
    ]
}

/// Mux the silent video and the voiceover into the final lesson video.
pub async fn combine_media(video: &Path, audio: &Path, dest: &Path) -> Result<PathBuf> {
    let combine_failed = |reason: String| RepetitorError::CombineFailed {
        output_path: dest.to_path_buf(),
        reason,
    };

    if !video.exists() {
        return Err(combine_failed(format!(
            "video file not found at {}",
            video.display()
        )));
    }
    if !audio.exists() {
        return Err(combine_failed(format!(
            "audio file not found at {}",
            audio.display()
        )));
    }

    let output = Command::new("ffmpeg")
        .args(mux_args(video, audio, dest))
        .output()
        .await?;

    if !output.status.success() {
        return Err(combine_failed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mux_contract_copies_video_and_truncates_to_shortest() {
        let args = mux_args(
            Path::new("silent.mp4"),
            Path::new("voiceover.mp3"),
            Path::new("final.mp4"),
        );
        let as_strings: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            as_strings,
            vec![
                "-y",
                "-i",
                "silent.mp4",
                "-i",
                "voiceover.mp3",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-shortest",
                "final.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn combine_fails_fast_on_missing_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("missing.mp4");
        let audio = dir.path().join("missing.mp3");
        let dest = dir.path().join("out.mp4");

        let err = combine_media(&video, &audio, &dest).await.unwrap_err();
        assert!(matches!(err, RepetitorError::CombineFailed { .. }));
    }
}
