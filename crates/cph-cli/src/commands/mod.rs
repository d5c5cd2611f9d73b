//! Command implementations.

pub mod curve;
pub mod map;
pub mod params;
pub mod pixel;
pub mod validate;

use crate::ParamArgs;
use anyhow::{Context, Result, bail};
use cph_core::{ParamField, ParameterSet};
use cph_fallback::ErrorHandler;
use cph_tone::ToneCurve;
use std::fs;
use std::sync::Arc;
use tracing::debug;

/// Reads the parameter file (if any) and applies flag overrides.
///
/// The result is uncorrected; see [`effective_params`].
pub fn load_params(args: &ParamArgs) -> Result<ParameterSet> {
    let mut params = match &args.file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => ParameterSet::default(),
    };

    if let Some(curve) = args.curve {
        params.curve = curve;
    }
    if let Some(pivot) = args.pivot {
        params.pivot_pq = pivot;
    }
    for item in &args.set {
        let (field, value) = parse_override(item)?;
        params.set(field, value);
    }
    params.dci_compliance |= args.dci;
    params.deterministic |= args.deterministic;
    Ok(params)
}

/// Parses `name=value` into a field and its value.
pub fn parse_override(item: &str) -> Result<(ParamField, f32)> {
    let Some((name, value)) = item.split_once('=') else {
        bail!("Override '{}' is not of the form FIELD=VALUE", item);
    };
    let name = name.trim();
    let Some(field) = ParamField::ALL.iter().copied().find(|f| f.name() == name) else {
        bail!("Unknown parameter '{}'", name);
    };
    let value: f32 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}'", name, value))?;
    Ok((field, value))
}

/// Loads parameters and runs them through a fresh error handler.
///
/// Corrections are logged by the handler and returned with it so callers
/// can report them.
pub fn effective_params(args: &ParamArgs) -> Result<(ParameterSet, Arc<ErrorHandler>)> {
    let mut params = load_params(args)?;
    let handler = Arc::new(ErrorHandler::new());
    handler.validate_and_correct_params(&mut params);
    debug!(corrections = handler.error_history().len(), "parameters loaded");
    Ok((params, handler))
}

/// Builds the tone curve from corrected parameters.
pub fn build_curve(args: &ParamArgs) -> Result<ToneCurve> {
    let (params, _) = effective_params(args)?;
    ToneCurve::new(&params).context("Failed to build tone curve")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cph_core::Curve;

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("gamma_s=1.4").unwrap(), (ParamField::GammaS, 1.4));
        assert_eq!(parse_override(" toe = 0.002 ").unwrap(), (ParamField::Toe, 0.002));
        assert!(parse_override("gamma_s").is_err());
        assert!(parse_override("gamma=1").is_err());
        assert!(parse_override("alpha=x").is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = ParamArgs {
            curve: Some(Curve::Rlog),
            pivot: Some(0.2),
            set: vec!["rlog_b=1.2".into()],
            dci: true,
            ..Default::default()
        };
        let p = load_params(&args).unwrap();
        assert_eq!(p.curve, Curve::Rlog);
        assert_eq!(p.pivot_pq, 0.2);
        assert_eq!(p.rlog_b, 1.2);
        assert!(p.dci_compliance);
        assert!(!p.deterministic);
    }

    #[test]
    fn test_effective_params_corrected() {
        let args = ParamArgs { pivot: Some(0.9), ..Default::default() };
        let (p, handler) = effective_params(&args).unwrap();
        assert_eq!(p.pivot_pq, 0.3);
        assert_eq!(handler.error_history().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let args = ParamArgs { file: Some("/nonexistent/grade.json".into()), ..Default::default() };
        assert!(load_params(&args).is_err());
    }
}
