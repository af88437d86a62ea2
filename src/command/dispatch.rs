// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of commands into wire writes.

use crate::error::CommandError;
use crate::profile::{BrandProfile, EchoPolicy};
use crate::protocol::Transport;
use crate::state::StateChange;

use super::Command;

/// A validated command in the brand's wire vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct WireCommand {
    field: &'static str,
    value: String,
    change: StateChange,
}

impl WireCommand {
    /// Returns the wire field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the wire value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the state change the write implies.
    #[must_use]
    pub fn change(&self) -> &StateChange {
        &self.change
    }
}

/// What the session should do after the device accepted a write.
#[derive(Debug, Clone, PartialEq)]
pub enum Echo {
    /// Apply the change to the local state now.
    Mirror(StateChange),
    /// Fetch a fresh status now.
    Repoll,
}

/// Validates a command and resolves its wire field.
///
/// # Errors
///
/// Returns [`CommandError::Malformed`] if the value is outside the brand's
/// domain or the brand has no wire field for this command.
pub fn prepare(profile: &BrandProfile, command: &Command) -> Result<WireCommand, CommandError> {
    command.validate(profile)?;

    let kind = command.kind();
    let field = profile.field_map.field(kind).ok_or_else(|| {
        CommandError::Malformed(format!(
            "{} does not support {kind}",
            profile.brand.display_name()
        ))
    })?;

    Ok(WireCommand {
        field,
        value: command.wire_value(),
        change: command.to_state_change(),
    })
}

/// Sends a command and returns the brand's echo policy for it.
///
/// Nothing is sent if [`prepare`] fails.
///
/// # Errors
///
/// Returns a [`CommandError`] if validation or the write fails.
pub async fn dispatch<T: Transport>(
    transport: &T,
    profile: &BrandProfile,
    command: &Command,
) -> Result<Echo, CommandError> {
    let wire = prepare(profile, command)?;

    tracing::debug!(
        brand = %profile.brand,
        field = wire.field,
        value = %wire.value,
        "Dispatching command"
    );

    transport.send(wire.field, &wire.value).await?;

    Ok(match profile.echo {
        EchoPolicy::MirrorLocally => Echo::Mirror(wire.change),
        EchoPolicy::Repoll => Echo::Repoll,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandErrorKind;
    use crate::protocol::scripted::{Reply, ScriptedTransport};
    use crate::types::PowerState;
    use serde_json::json;

    #[test]
    fn prepare_uses_field_map() {
        let me = prepare(
            &BrandProfile::MITSUBISHI_ELECTRIC,
            &Command::WideVaneMode("left".into()),
        )
        .unwrap();
        assert_eq!(me.field(), "widevane");

        let mhi = prepare(
            &BrandProfile::MITSUBISHI_HEAVY_INDUSTRIES,
            &Command::WideVaneMode("7".into()),
        )
        .unwrap();
        assert_eq!(mhi.field(), "vanelr");

        let lg = prepare(&BrandProfile::LG, &Command::VaneMode("swing".into())).unwrap();
        assert_eq!(lg.field(), "vane1");

        let temp = prepare(&BrandProfile::LG, &Command::TargetTemperature(22.5)).unwrap();
        assert_eq!(temp.field(), "set_temperature");
        assert_eq!(temp.value(), "22.5");
        assert_eq!(temp.change(), &StateChange::TargetTemperature(22.5));
    }

    #[test]
    fn unsupported_command_is_malformed() {
        let err = prepare(
            &BrandProfile::MITSUBISHI_HEAVY_INDUSTRIES,
            &Command::RemoteTemperature(20.0),
        )
        .unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::Malformed);
    }

    #[tokio::test]
    async fn invalid_command_sends_nothing() {
        let transport = ScriptedTransport::new(json!({}));
        let err = dispatch(
            &transport,
            &BrandProfile::LG,
            &Command::OperatingMode("turbo".into()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), CommandErrorKind::Malformed);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn echo_follows_brand_policy() {
        let transport = ScriptedTransport::new(json!({}));
        let command = Command::Power(PowerState::On);

        let mirror = dispatch(&transport, &BrandProfile::MITSUBISHI_ELECTRIC, &command)
            .await
            .unwrap();
        assert_eq!(mirror, Echo::Mirror(StateChange::Power(true)));

        let repoll = dispatch(&transport, &BrandProfile::GENERIC_LEGACY, &command)
            .await
            .unwrap();
        assert_eq!(repoll, Echo::Repoll);

        assert_eq!(
            transport.sent(),
            vec![
                ("power".to_string(), "on".to_string()),
                ("power".to_string(), "on".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn transport_failures_are_classified() {
        let transport = ScriptedTransport::new(json!({}));
        let command = Command::FanSpeed("auto".into());

        transport.set_send_reply(Reply::HttpStatus(500));
        let err = dispatch(&transport, &BrandProfile::LG, &command).await.unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::Rejected);

        transport.set_send_reply(Reply::Unreachable);
        let err = dispatch(&transport, &BrandProfile::LG, &command).await.unwrap_err();
        assert_eq!(err.kind(), CommandErrorKind::Unreachable);
    }
}
