use super::error::ActionError;

/// Where a display action should render its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayLocation {
    #[default]
    Feedback,
    Indicators,
}

/// What a fired rule asks the host to do.
///
/// Kinds that carry a `data` expression have it evaluated; the rendered
/// result is paired with the action in a [`RuleEffect`](super::RuleEffect).
/// An [`Assign`](RuleAction::Assign) with an empty `field` writes the
/// calculated variable named by `content` instead of producing an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum RuleAction {
    Assign {
        field: String,
        content: String,
        data: String,
    },
    DisplayText {
        location: DisplayLocation,
        content: String,
        data: String,
    },
    DisplayKeyValuePair {
        location: DisplayLocation,
        content: String,
        data: String,
    },
    ShowWarning {
        field: String,
        content: String,
        data: String,
    },
    ShowError {
        field: String,
        content: String,
        data: String,
    },
    WarningOnCompletion {
        field: String,
        content: String,
        data: String,
    },
    ErrorOnCompletion {
        field: String,
        content: String,
        data: String,
    },
    HideField {
        field: String,
        content: String,
    },
    HideSection {
        section: String,
    },
    HideProgramStage {
        program_stage: String,
    },
    SetMandatoryField {
        field: String,
    },
    HideOption {
        field: String,
        option: String,
        content: String,
    },
    HideOptionGroup {
        field: String,
        option_group: String,
        content: String,
    },
    ShowOptionGroup {
        field: String,
        option_group: String,
        content: String,
    },
    CreateEvent {
        program_stage: String,
        content: String,
        data: String,
    },
    SendMessage {
        notification: String,
        data: String,
    },
    ScheduleMessage {
        notification: String,
        data: String,
    },
}

impl RuleAction {
    /// Assign the result of `data` to a field, or to the calculated variable
    /// named by `content` when `field` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::MissingAssignTarget`] when both `field` and
    /// `content` are empty.
    pub fn assign(
        field: impl Into<String>,
        content: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, ActionError> {
        let (field, content) = (field.into(), content.into());
        if field.is_empty() && content.is_empty() {
            return Err(ActionError::MissingAssignTarget);
        }
        Ok(RuleAction::Assign {
            field,
            content,
            data: data.into(),
        })
    }

    /// Assign the result of `data` to a calculated variable.
    pub fn assign_variable(variable: impl Into<String>, data: impl Into<String>) -> Self {
        RuleAction::Assign {
            field: String::new(),
            content: variable.into(),
            data: data.into(),
        }
    }

    pub fn display_text(content: impl Into<String>, data: impl Into<String>) -> Self {
        RuleAction::DisplayText {
            location: DisplayLocation::Feedback,
            content: content.into(),
            data: data.into(),
        }
    }

    pub fn display_key_value_pair(
        location: DisplayLocation,
        content: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        RuleAction::DisplayKeyValuePair {
            location,
            content: content.into(),
            data: data.into(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ActionError::EmptyMessage`] when content, data and field are all empty.
    pub fn show_warning(
        content: impl Into<String>,
        data: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ActionError> {
        let (content, data, field) = message_parts("show warning", content, data, field)?;
        Ok(RuleAction::ShowWarning {
            field,
            content,
            data,
        })
    }

    /// # Errors
    ///
    /// Returns [`ActionError::EmptyMessage`] when content, data and field are all empty.
    pub fn show_error(
        content: impl Into<String>,
        data: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ActionError> {
        let (content, data, field) = message_parts("show error", content, data, field)?;
        Ok(RuleAction::ShowError {
            field,
            content,
            data,
        })
    }

    /// # Errors
    ///
    /// Returns [`ActionError::EmptyMessage`] when content, data and field are all empty.
    pub fn warning_on_completion(
        content: impl Into<String>,
        data: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ActionError> {
        let (content, data, field) = message_parts("warning on completion", content, data, field)?;
        Ok(RuleAction::WarningOnCompletion {
            field,
            content,
            data,
        })
    }

    /// # Errors
    ///
    /// Returns [`ActionError::EmptyMessage`] when content, data and field are all empty.
    pub fn error_on_completion(
        content: impl Into<String>,
        data: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ActionError> {
        let (content, data, field) = message_parts("error on completion", content, data, field)?;
        Ok(RuleAction::ErrorOnCompletion {
            field,
            content,
            data,
        })
    }

    pub fn hide_field(field: impl Into<String>) -> Self {
        RuleAction::HideField {
            field: field.into(),
            content: String::new(),
        }
    }

    /// The data expression evaluated when this action fires. Empty for kinds
    /// that carry none.
    #[must_use]
    pub fn data(&self) -> &str {
        match self {
            RuleAction::Assign { data, .. }
            | RuleAction::DisplayText { data, .. }
            | RuleAction::DisplayKeyValuePair { data, .. }
            | RuleAction::ShowWarning { data, .. }
            | RuleAction::ShowError { data, .. }
            | RuleAction::WarningOnCompletion { data, .. }
            | RuleAction::ErrorOnCompletion { data, .. }
            | RuleAction::CreateEvent { data, .. }
            | RuleAction::SendMessage { data, .. }
            | RuleAction::ScheduleMessage { data, .. } => data,
            RuleAction::HideField { .. }
            | RuleAction::HideSection { .. }
            | RuleAction::HideProgramStage { .. }
            | RuleAction::SetMandatoryField { .. }
            | RuleAction::HideOption { .. }
            | RuleAction::HideOptionGroup { .. }
            | RuleAction::ShowOptionGroup { .. } => "",
        }
    }

    /// Calculated variable targeted by an assign action with no field.
    #[must_use]
    pub fn calculated_target(&self) -> Option<&str> {
        match self {
            RuleAction::Assign { field, content, .. } if field.is_empty() => Some(content),
            _ => None,
        }
    }

    /// Short name of the action kind, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RuleAction::Assign { .. } => "assign",
            RuleAction::DisplayText { .. } => "display_text",
            RuleAction::DisplayKeyValuePair { .. } => "display_key_value_pair",
            RuleAction::ShowWarning { .. } => "show_warning",
            RuleAction::ShowError { .. } => "show_error",
            RuleAction::WarningOnCompletion { .. } => "warning_on_completion",
            RuleAction::ErrorOnCompletion { .. } => "error_on_completion",
            RuleAction::HideField { .. } => "hide_field",
            RuleAction::HideSection { .. } => "hide_section",
            RuleAction::HideProgramStage { .. } => "hide_program_stage",
            RuleAction::SetMandatoryField { .. } => "set_mandatory_field",
            RuleAction::HideOption { .. } => "hide_option",
            RuleAction::HideOptionGroup { .. } => "hide_option_group",
            RuleAction::ShowOptionGroup { .. } => "show_option_group",
            RuleAction::CreateEvent { .. } => "create_event",
            RuleAction::SendMessage { .. } => "send_message",
            RuleAction::ScheduleMessage { .. } => "schedule_message",
        }
    }
}

fn message_parts(
    action: &'static str,
    content: impl Into<String>,
    data: impl Into<String>,
    field: impl Into<String>,
) -> Result<(String, String, String), ActionError> {
    let (content, data, field) = (content.into(), data.into(), field.into());
    if content.is_empty() && data.is_empty() && field.is_empty() {
        return Err(ActionError::EmptyMessage { action });
    }
    Ok((content, data, field))
}
