//! Declarative automation steps as loaded from the configuration file.
//!
//! On the wire a step is `{"type": "<kind>", "description": "...", "params": {...}}`.
//! The `type` string is resolved into [`StepKind`] at load time, so an unknown kind
//! is a configuration error rather than something discovered mid-run.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Logical screen position `[x, y]` as captured by the operator.
pub type Position = [f64; 2];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMethod {
    /// Click a configured save button, then fill the dialog.
    #[default]
    Button,
    /// Open the save dialog with the platform save shortcut.
    Hotkey,
    /// The dialog is already open; only fill and confirm it.
    Dialog,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Always,
    SkipIfExists,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClickParams {
    pub position: Option<Position>,
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PauseParams {
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaitParams {
    pub duration: f64,
}

impl Default for WaitParams {
    fn default() -> Self {
        Self { duration: 1.0 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HotkeyParams {
    pub keys: Vec<String>,
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeParams {
    pub text: Option<String>,
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PressParams {
    pub key: Option<String>,
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SaveParams {
    pub method: Option<SaveMethod>,
    pub button_position: Option<Position>,
    pub wait_after: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConditionalParams {
    pub condition: Condition,
    pub steps: Vec<StepSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StepKind {
    GenerateText,
    CopyToClipboard,
    CopyIdToClipboard,
    ActivateWindow,
    Click(ClickParams),
    Paste(PauseParams),
    SelectAll(PauseParams),
    Delete(PauseParams),
    Wait(WaitParams),
    Hotkey(HotkeyParams),
    Type(TypeParams),
    Press(PressParams),
    SaveFile(SaveParams),
    Conditional(ConditionalParams),
}

impl StepKind {
    /// The wire name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::GenerateText => "generate_text",
            StepKind::CopyToClipboard => "copy_to_clipboard",
            StepKind::CopyIdToClipboard => "copy_id_to_clipboard",
            StepKind::ActivateWindow => "activate_window",
            StepKind::Click(_) => "click",
            StepKind::Paste(_) => "paste",
            StepKind::SelectAll(_) => "select_all",
            StepKind::Delete(_) => "delete",
            StepKind::Wait(_) => "wait",
            StepKind::Hotkey(_) => "hotkey",
            StepKind::Type(_) => "type",
            StepKind::Press(_) => "press",
            StepKind::SaveFile(_) => "save_file",
            StepKind::Conditional(_) => "conditional",
        }
    }
}

/// One configured automation step. Read-only once loaded.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawStep")]
pub struct StepSpec {
    pub description: String,
    pub kind: StepKind,
}

impl StepSpec {
    pub fn new(kind: StepKind) -> Self {
        Self {
            description: kind.name().to_string(),
            kind,
        }
    }

    pub fn described(description: impl Into<String>, kind: StepKind) -> Self {
        Self {
            description: description.into(),
            kind,
        }
    }
}

#[derive(Deserialize)]
struct RawStep {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    params: serde_json::Map<String, serde_json::Value>,
}

fn decode_params<T: DeserializeOwned>(
    kind: &str,
    params: serde_json::Map<String, serde_json::Value>,
) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::Object(params))
        .map_err(|e| format!("invalid params for step '{}': {}", kind, e))
}

impl TryFrom<RawStep> for StepSpec {
    type Error = String;

    fn try_from(raw: RawStep) -> Result<Self, Self::Error> {
        let RawStep {
            kind: name,
            description,
            params,
        } = raw;

        let kind = match name.as_str() {
            "generate_text" => StepKind::GenerateText,
            "copy_to_clipboard" => StepKind::CopyToClipboard,
            "copy_id_to_clipboard" => StepKind::CopyIdToClipboard,
            "activate_window" => StepKind::ActivateWindow,
            "click" => StepKind::Click(decode_params(&name, params)?),
            "paste" => StepKind::Paste(decode_params(&name, params)?),
            "select_all" => StepKind::SelectAll(decode_params(&name, params)?),
            "delete" => StepKind::Delete(decode_params(&name, params)?),
            "wait" => StepKind::Wait(decode_params(&name, params)?),
            "hotkey" => StepKind::Hotkey(decode_params(&name, params)?),
            "type" => StepKind::Type(decode_params(&name, params)?),
            "press" => StepKind::Press(decode_params(&name, params)?),
            "save_file" => StepKind::SaveFile(decode_params(&name, params)?),
            "conditional" => StepKind::Conditional(decode_params(&name, params)?),
            other => return Err(format!("unknown step type '{}'", other)),
        };

        Ok(StepSpec {
            description: description.unwrap_or_else(|| name.clone()),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_click_with_params() {
        let step: StepSpec = serde_json::from_str(
            r#"{"type": "click", "description": "input box", "params": {"position": [120, 340], "wait_after": 0.3}}"#,
        )
        .unwrap();
        assert_eq!(step.description, "input box");
        assert_eq!(
            step.kind,
            StepKind::Click(ClickParams {
                position: Some([120.0, 340.0]),
                wait_after: Some(0.3),
            })
        );
    }

    #[test]
    fn missing_params_and_description_use_defaults() {
        let step: StepSpec = serde_json::from_str(r#"{"type": "wait"}"#).unwrap();
        assert_eq!(step.description, "wait");
        assert_eq!(step.kind, StepKind::Wait(WaitParams { duration: 1.0 }));
    }

    #[test]
    fn conditional_nests_sub_steps() {
        let step: StepSpec = serde_json::from_str(
            r#"{
                "type": "conditional",
                "params": {
                    "condition": "skip_if_exists",
                    "steps": [
                        {"type": "paste"},
                        {"type": "save_file", "params": {"method": "hotkey"}}
                    ]
                }
            }"#,
        )
        .unwrap();
        let StepKind::Conditional(params) = step.kind else {
            panic!("expected conditional");
        };
        assert_eq!(params.condition, Condition::SkipIfExists);
        assert_eq!(params.steps.len(), 2);
        assert_eq!(params.steps[1].kind.name(), "save_file");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = serde_json::from_str::<StepSpec>(r#"{"type": "teleport"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown step type 'teleport'"));
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let result = serde_json::from_str::<StepSpec>(
            r#"{"type": "conditional", "params": {"condition": "sometimes"}}"#,
        );
        assert!(result.is_err());
    }
}
