//! Operator setup file
//!
//! Everything the operator configures between sessions, saved as pretty JSON so
//! a previous setup can be restored in one step.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::camera_pipeline::common::error::{AcquisitionError, Result};
use crate::camera_pipeline::processing::RenderParams;
use crate::camera_pipeline::session::{SessionConfig, SessionControls};
use crate::camera_pipeline::source::DeviceSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorSetup {
    pub device: DeviceSettings,
    pub render: RenderParams,
    pub directory: PathBuf,
    pub base_name: String,
    pub persist: bool,
}

impl Default for OperatorSetup {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            device: DeviceSettings::default(),
            render: RenderParams::default(),
            directory: session.directory,
            base_name: session.base_name,
            persist: true,
        }
    }
}

impl OperatorSetup {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AcquisitionError::SetupError(format!("{}: {}", path.display(), e)))?;
        let setup: Self = serde_json::from_str(&text)
            .map_err(|e| AcquisitionError::SetupError(format!("{}: {}", path.display(), e)))?;
        setup.render.validate()?;
        setup.device.subarea.validate()?;
        info!("Setup loaded");
        Ok(setup)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| AcquisitionError::SetupError(e.to_string()))?;
        std::fs::write(path, text)?;
        info!("Setup saved");
        Ok(())
    }

    /// Captures the current operator state.
    pub fn capture(device: &DeviceSettings, controls: &SessionControls, config: &SessionConfig) -> Self {
        Self {
            device: device.clone(),
            render: controls.render(),
            directory: config.directory.clone(),
            base_name: config.base_name.clone(),
            persist: controls.persist_enabled(),
        }
    }

    /// Restores render parameters and the persistence flag.
    pub fn apply_to(&self, controls: &SessionControls) {
        controls.set_render(self.render);
        controls.set_persist(self.persist);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_pipeline::processing::{Colormap, ViewMode};
    use crate::camera_pipeline::source::TriggerMode;

    #[test]
    fn saved_setup_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");

        let mut setup = OperatorSetup::default();
        setup.device.trigger = TriggerMode::Software;
        setup.device.exposure_ms = 250;
        setup.render.rotation = 3;
        setup.render.colormap = Colormap::Inferno;
        setup.render.view = ViewMode::Difference;
        setup.base_name = "scan".to_string();
        setup.persist = false;

        setup.save(&path).unwrap();
        assert_eq!(OperatorSetup::load(&path).unwrap(), setup);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");
        std::fs::write(&path, r#"{ "render": { "colormap": "jet" }, "base_name": "run" }"#).unwrap();

        let setup = OperatorSetup::load(&path).unwrap();
        assert_eq!(setup.render.colormap, Colormap::Jet);
        assert_eq!(setup.render.ceiling_percent, 100.0);
        assert_eq!(setup.base_name, "run");
        assert_eq!(setup.device, DeviceSettings::default());
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");
        std::fs::write(&path, r#"{ "render": { "floor_percent": 120.0 } }"#).unwrap();
        assert!(matches!(
            OperatorSetup::load(&path),
            Err(AcquisitionError::InvalidSetting(_))
        ));
    }

    #[test]
    fn out_of_sensor_subarea_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");
        let max = u32::MAX;
        std::fs::write(
            &path,
            format!(
                r#"{{ "device": {{ "subarea": {{ "origin_x": {}, "origin_y": 0, "end_x": 5, "end_y": 1040, "bin_x": 1, "bin_y": 1 }} }} }}"#,
                max - 3
            ),
        )
        .unwrap();

        assert!(matches!(
            OperatorSetup::load(&path),
            Err(AcquisitionError::InvalidSetting(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(OperatorSetup::load(&path), Err(AcquisitionError::SetupError(_))));
        assert!(matches!(
            OperatorSetup::load(&dir.path().join("absent.json")),
            Err(AcquisitionError::SetupError(_))
        ));
    }

    #[test]
    fn capture_and_apply_round_trip_controls() {
        let controls = SessionControls::default();
        controls.rotate(2);
        controls.set_persist(false);
        let setup = OperatorSetup::capture(&DeviceSettings::default(), &controls, &SessionConfig::default());

        let restored = SessionControls::default();
        setup.apply_to(&restored);
        assert_eq!(restored.render().rotation, 2);
        assert!(!restored.persist_enabled());
    }
}
