//! Parameter type and range validation
//!
//! Supplied values are checked against [`ParamDecl`] declarations: first the
//! expected type, then the optional range, enumerated-set or per-element
//! constraint.

use crate::error::{Result, ValidationError};
use crate::schema::{Constraint, MetricRegistry, ParamDecl};
use crate::tracing_config::{events, spans};
use crate::types::{ParamSet, ParamType, ParamValue};
use tracing::{debug, trace};

/// Validator for individual parameter values
pub struct ParamValidator;

impl ParamValidator {
    /// Validate that `value` is an instance of `expected`
    pub fn validate_type(name: &str, expected: &ParamType, value: &ParamValue) -> Result<()> {
        if expected.matches(value) {
            return Ok(());
        }

        if let (ParamType::List(element), ParamValue::List(values)) = (expected, value) {
            if let Some(bad) = values.iter().find(|v| !element.matches(v)) {
                return Err(ValidationError::type_mismatch(format!(
                    "Parameter {} is a list of {} but contains an element of type {}",
                    name,
                    element,
                    bad.type_name()
                )));
            }
        }

        Err(ValidationError::type_mismatch(format!(
            "Parameter {} is of type {} while it should be of type {}",
            name,
            value.type_name(),
            expected
        )))
    }

    /// Validate `value` against a constraint, assuming its type is already checked
    pub fn validate_constraint(
        name: &str,
        constraint: &Constraint,
        value: &ParamValue,
    ) -> Result<()> {
        match constraint {
            Constraint::Range(range) => {
                let number = value.as_f64().ok_or_else(|| {
                    ValidationError::type_mismatch(format!(
                        "Parameter {} is of type {} but a numeric range applies to it",
                        name,
                        value.type_name()
                    ))
                })?;
                if !range.contains(number) {
                    return Err(ValidationError::out_of_range(name, value, range));
                }
                Ok(())
            },
            Constraint::OneOf(allowed) => {
                if allowed.iter().any(|candidate| candidate.loosely_eq(value)) {
                    return Ok(());
                }
                Err(ValidationError::value(format!(
                    "Parameter {} is {}, while it should be one of the following {}",
                    name,
                    value,
                    ParamValue::List(allowed.clone())
                )))
            },
            Constraint::Each(inner) => {
                let ParamValue::List(values) = value else {
                    return Err(ValidationError::type_mismatch(format!(
                        "Parameter {} is of type {} but a per-element constraint applies to it",
                        name,
                        value.type_name()
                    )));
                };
                for (index, element) in values.iter().enumerate() {
                    Self::validate_constraint(&format!("{}[{}]", name, index), inner, element)?;
                }
                Ok(())
            },
        }
    }

    /// Validate `value` against a full declaration
    pub fn validate(decl: &ParamDecl, value: &ParamValue) -> Result<()> {
        Self::validate_type(&decl.name, &decl.expected, value)?;
        if let Some(constraint) = &decl.constraint {
            Self::validate_constraint(&decl.name, constraint, value)?;
        }
        trace!(parameter = %decl.name, value = %value, "Parameter accepted");
        Ok(())
    }
}

/// Validate supplied parameters against reference declarations
///
/// Every declared parameter must be present in `parameters` and satisfy its
/// declaration. Supplied parameters that are not declared are ignored. Each
/// declaration is checked independently, in order, and the first violation
/// is returned. A malformed declaration fails with
/// [`ValidationError::InvalidConfig`] before any value is looked at.
pub fn validate_params(parameters: &ParamSet, references: &[ParamDecl]) -> Result<()> {
    let _span = spans::params_check(references.len()).entered();

    for decl in references {
        decl.validate().map_err(|e| events::rejected("params", e))?;
    }

    for decl in references {
        let value = parameters.get(&decl.name).ok_or_else(|| {
            events::rejected(
                "params",
                ValidationError::MissingParameter(decl.name.clone()),
            )
        })?;
        ParamValidator::validate(decl, value).map_err(|e| events::rejected("params", e))?;
    }

    debug!(checked = references.len(), "Parameters accepted");
    Ok(())
}

/// Validate metric parameters against the built-in metric registry
///
/// # Errors
/// * [`ValidationError::Value`] if `metric` is not registered, a value is out of
///   range, or a supplied name is not a parameter of any registered metric
/// * [`ValidationError::Type`] if a value has the wrong type
pub fn validate_metric_params(metric: &str, metric_params: &ParamSet) -> Result<()> {
    validate_metric_params_in(MetricRegistry::global(), metric, metric_params)
}

pub(crate) fn validate_metric_params_in(
    registry: &MetricRegistry,
    metric: &str,
    metric_params: &ParamSet,
) -> Result<()> {
    let _span = spans::metric_params_check(metric).entered();

    let schema = registry.schema(metric).ok_or_else(|| {
        events::rejected(
            "metric_params",
            ValidationError::unknown_metric(metric, &registry.metrics()),
        )
    })?;

    // Declared but unsupplied parameters are not required
    for decl in schema {
        if let Some(value) = metric_params.get(&decl.name) {
            ParamValidator::validate(decl, value)
                .map_err(|e| events::rejected("metric_params", e))?;
        }
    }

    // Names are checked against every metric's parameters, not just this one's
    let known = registry.parameter_names();
    if let Some(unknown) = metric_params.keys().find(|name| !known.contains(name)) {
        let available: Vec<&str> = known.into_iter().collect();
        return Err(events::rejected(
            "metric_params",
            ValidationError::unknown_parameter(unknown, &available),
        ));
    }

    debug!(metric = %metric, supplied = metric_params.len(), "Metric parameters accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::ParamRange;

    fn hyperparameters() -> Vec<ParamDecl> {
        vec![
            ParamDecl::new("n_jobs", ParamType::Integer),
            ParamDecl::new("n_values", ParamType::Integer).in_range(ParamRange::at_least(1.0)),
            ParamDecl::new("homology_dimensions", ParamType::list_of(ParamType::Integer))
                .each(Constraint::Range(ParamRange::at_least(0.0))),
            ParamDecl::new("order", ParamType::Real).in_range(ParamRange::at_least(1.0)),
            ParamDecl::new("mode", ParamType::Text).one_of(["all", "first"]),
        ]
    }

    fn valid_params() -> ParamSet {
        ParamSet::new()
            .with("n_jobs", 4)
            .with("n_values", 100)
            .with("homology_dimensions", vec![0, 1, 2])
            .with("order", 2.0)
            .with("mode", "all")
    }

    #[test]
    fn test_valid_params() {
        assert!(validate_params(&valid_params(), &hyperparameters()).is_ok());
        assert!(validate_params(&ParamSet::new(), &[]).is_ok());
    }

    #[test]
    fn test_undeclared_params_are_ignored() {
        let params = valid_params().with("verbose", true);
        assert!(validate_params(&params, &hyperparameters()).is_ok());
    }

    #[test]
    fn test_missing_param() {
        let references = hyperparameters();
        let mut params = ParamSet::new();
        params.insert("n_jobs", 1);
        let err = validate_params(&params, &references).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("n_values".to_string()));
    }

    #[test]
    fn test_scalar_type_and_range() {
        let references = hyperparameters();

        let params = valid_params().with("n_values", 10.0);
        assert_eq!(
            validate_params(&params, &references).unwrap_err().kind(),
            ErrorKind::Type
        );

        let params = valid_params().with("n_values", 0);
        assert_eq!(
            validate_params(&params, &references).unwrap_err().kind(),
            ErrorKind::Value
        );
    }

    #[test]
    fn test_list_elements() {
        let references = hyperparameters();

        let params = valid_params().with(
            "homology_dimensions",
            ParamValue::List(vec![ParamValue::Int(0), ParamValue::Real(1.5)]),
        );
        let err = validate_params(&params, &references).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().contains("contains an element of type real"));

        let params = valid_params().with("homology_dimensions", vec![0, -1]);
        let err = validate_params(&params, &references).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("homology_dimensions[1]"));
    }

    #[test]
    fn test_keys_after_a_list_are_still_checked() {
        let params = valid_params().with("order", 0.5);
        let err = validate_params(&params, &hyperparameters()).unwrap_err();
        assert!(err.to_string().contains("order"));

        let params = valid_params().with("mode", "middle");
        let err = validate_params(&params, &hyperparameters()).unwrap_err();
        assert!(err.to_string().contains("one of the following"));
    }

    #[test]
    fn test_list_declared_with_plain_range_is_a_config_error() {
        let references = vec![ParamDecl::new("dims", ParamType::list_of(ParamType::Integer))
            .in_range(ParamRange::at_least(0.0))];
        let params = ParamSet::new().with("dims", vec![0, 1]);

        let err = validate_params(&params, &references).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConfig(_)));

        // The per-element form of the same declaration is accepted
        let references = vec![ParamDecl::new("dims", ParamType::list_of(ParamType::Integer))
            .each(Constraint::Range(ParamRange::at_least(0.0)))];
        assert!(validate_params(&params, &references).is_ok());
    }

    #[test]
    fn test_malformed_declaration_is_reported_even_when_values_are_missing() {
        let references = vec![
            ParamDecl::new("n_jobs", ParamType::Integer),
            ParamDecl::new("mode", ParamType::Text).in_range(ParamRange::closed(0.0, 1.0)),
        ];
        let err = validate_params(&ParamSet::new(), &references).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidConfig(_)));
    }

    #[test]
    fn test_enumerated_numbers_compare_by_value() {
        let decl = ParamDecl::new("p", ParamType::Real).one_of([1.0, 2.0]);
        assert!(ParamValidator::validate(&decl, &ParamValue::Int(2)).is_ok());
        assert!(ParamValidator::validate(&decl, &ParamValue::Real(3.0)).is_err());
    }

    #[test]
    fn test_metric_params() {
        assert!(validate_metric_params("bottleneck", &ParamSet::new().with("delta", 0.01)).is_ok());
        assert!(validate_metric_params("heat", &ParamSet::new()).is_ok());

        // Names from another metric's schema are tolerated
        let params = ParamSet::new().with("delta", 0.5).with("n_layers", 3);
        assert!(validate_metric_params("bottleneck", &params).is_ok());

        let err = validate_metric_params("bottleneck", &ParamSet::new().with("delta", 1.5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_metric_params_type_error() {
        let err =
            validate_metric_params("wasserstein", &ParamSet::new().with("p", 2.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err =
            validate_metric_params("landscape", &ParamSet::new().with("p", "two")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_heat_sigma_lower_bound_is_inclusive() {
        assert!(validate_metric_params("heat", &ParamSet::new().with("sigma", 0.0)).is_ok());
        assert!(validate_metric_params("heat", &ParamSet::new().with("sigma", 1e-3)).is_ok());

        let err =
            validate_metric_params("heat", &ParamSet::new().with("sigma", -1e-3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_nan_is_out_of_range() {
        let err = validate_metric_params("betti", &ParamSet::new().with("p", f64::NAN))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }
}
