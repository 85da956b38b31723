use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
    Recording,
}

impl CameraStatus {
    /// Badge label.
    pub fn label(self) -> &'static str {
        match self {
            CameraStatus::Online => "Live",
            CameraStatus::Recording => "Recording",
            CameraStatus::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: String,
    pub unit_id: Option<String>,
    pub status: CameraStatus,
    pub stream_url: String,
    pub last_update: DateTime<Utc>,
}

/// Status text for a camera tile.
pub fn camera_status_text(status: CameraStatus) -> &'static str {
    status.label()
}

/// Placeholder frame shown when a stream cannot be opened.
pub const PLACEHOLDER_STREAM: &str = "/placeholder.svg";

impl Camera {
    /// Stream to display; offline cameras fall back to the placeholder and
    /// are never retried.
    pub fn display_stream(&self) -> &str {
        match self.status {
            CameraStatus::Offline => PLACEHOLDER_STREAM,
            _ => &self.stream_url,
        }
    }
}

pub fn mock_cameras(now: DateTime<Utc>) -> Vec<Camera> {
    let cam = |id: &str, name: &str, location: &str, unit: Option<&str>, status, url: &str, last| Camera {
        id: id.into(),
        name: name.into(),
        location: location.into(),
        unit_id: unit.map(Into::into),
        status,
        stream_url: url.into(),
        last_update: last,
    };
    vec![
        cam("cam-001", "Main Entrance", "Front Gate", None, CameraStatus::Online,
            "/security-camera-entrance-view.jpg", now),
        cam("cam-002", "Unit A-12 Interior", "Container Storage", Some("1"), CameraStatus::Online,
            "/storage-unit-interior-camera.jpg", now),
        cam("cam-003", "Vehicle Bay", "Vehicle Storage Area", None, CameraStatus::Recording,
            "/vehicle-storage-security-camera.jpg", now),
        cam("cam-004", "Perimeter North", "North Fence", None, CameraStatus::Offline,
            PLACEHOLDER_STREAM, now - Duration::minutes(30)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(CameraStatus::Online.label(), "Live");
        assert_eq!(CameraStatus::Recording.label(), "Recording");
        assert_eq!(CameraStatus::Offline.label(), "Offline");
    }

    #[test]
    fn offline_camera_shows_placeholder() {
        let cams = mock_cameras(Utc::now());
        assert_eq!(cams[3].display_stream(), PLACEHOLDER_STREAM);
        assert_eq!(cams[0].display_stream(), "/security-camera-entrance-view.jpg");
        assert_eq!(cams[1].unit_id.as_deref(), Some("1"));
    }
}
