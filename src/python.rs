//! Python bindings for statpower.
//!
//! Exposes one solver per design using PyO3. Leave exactly one numeric
//! argument as `None` to solve for it; options are passed by their
//! canonical names. The solved value is returned as is, or as a dict of
//! every input and output with `full_output=True`. Enable the `python`
//! feature to use this.
//!
//! ```python
//! import statpower
//!
//! sizes = statpower.two_proportion(
//!     alpha=0.05, power=0.8, treatment_proportion=0.8, reference_proportion=0.95,
//!     group_allocation={"RATIO_OF_TREATMENT_TO_REFERENCE": 2},
//! )
//! assert sizes == (120, 60)
//! ```

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::Error;
use crate::option::{Alternative, SearchDirection};
use crate::procedures::one_proportion::{
    OneProportion, OneProportionSolution, Target as OneProportionTarget,
    TestType as OneProportionTest,
};
use crate::procedures::two_proportion::{
    GroupAllocation, GroupAllocationOption, Target as TwoProportionTarget,
    TestType as TwoProportionTest, TwoProportion, TwoProportionSolution,
};

fn to_py_err(err: Error) -> PyErr {
    if err.is_type_error() {
        PyTypeError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

fn parse<T>(text: &str) -> PyResult<T>
where
    T: std::str::FromStr<Err = Error>,
{
    text.parse().map_err(to_py_err)
}

fn parse_direction(text: Option<&str>) -> PyResult<Option<SearchDirection>> {
    text.map(parse::<SearchDirection>).transpose()
}

/// Build an allocation from `{"OPTION": value}`; the value of `EQUAL` is ignored.
fn parse_allocation(spec: Option<&PyDict>) -> PyResult<GroupAllocation> {
    let mut allocation = GroupAllocation::new();
    let Some(spec) = spec else {
        return Ok(allocation);
    };
    for (key, value) in spec.iter() {
        let name: &str = key.extract().map_err(|_| {
            to_py_err(Error::parameter_type(
                "group allocation",
                format!("keys must be option names, got {key}"),
            ))
        })?;
        let option: GroupAllocationOption = parse(name)?;
        let value = if option == GroupAllocationOption::Equal {
            0.0
        } else {
            value.extract::<f64>().map_err(|_| {
                to_py_err(Error::parameter_type(
                    "group allocation",
                    format!("{option} must be a number, got {value}"),
                ))
            })?
        };
        allocation = allocation.with(option, value);
    }
    Ok(allocation)
}

/// Solve a one-sample proportion design.
///
/// Returns the solved value; a solved size is rounded up to whole subjects.
#[pyfunction]
#[pyo3(name = "one_proportion", signature = (
    size=None,
    alpha=None,
    power=None,
    null_proportion=None,
    proportion=None,
    alternative="TWO_SIDED",
    test_type="EXACT_TEST",
    search_direction=None,
    dropout_rate=0.0,
    full_output=false,
))]
#[allow(clippy::too_many_arguments)]
fn solve_one_proportion(
    py: Python<'_>,
    size: Option<f64>,
    alpha: Option<f64>,
    power: Option<f64>,
    null_proportion: Option<f64>,
    proportion: Option<f64>,
    alternative: &str,
    test_type: &str,
    search_direction: Option<&str>,
    dropout_rate: f64,
    full_output: bool,
) -> PyResult<PyObject> {
    let mut design = OneProportion::new()
        .size(size)
        .alpha(alpha)
        .power(power)
        .null_proportion(null_proportion)
        .proportion(proportion)
        .alternative(parse::<Alternative>(alternative)?)
        .test_type(parse::<OneProportionTest>(test_type)?)
        .dropout_rate(dropout_rate);
    if let Some(direction) = parse_direction(search_direction)? {
        design = design.search_direction(direction);
    }
    let solution = design.solve().map_err(to_py_err)?;

    if full_output {
        one_proportion_record(py, &solution)
    } else if solution.target == OneProportionTarget::Size {
        Ok(solution.sample_size().into_py(py))
    } else {
        Ok(solution.value().into_py(py))
    }
}

fn one_proportion_record(py: Python<'_>, solution: &OneProportionSolution) -> PyResult<PyObject> {
    let result = PyDict::new(py);
    result.set_item("target", solution.target.as_str())?;
    result.set_item("value", solution.value())?;
    result.set_item("size", solution.size)?;
    result.set_item("alpha", solution.alpha)?;
    result.set_item("power", solution.power)?;
    result.set_item("null_proportion", solution.null_proportion)?;
    result.set_item("proportion", solution.proportion)?;
    result.set_item("alternative", solution.alternative.as_str())?;
    result.set_item("test_type", solution.test_type.as_str())?;
    result.set_item(
        "search_direction",
        solution.search_direction.map(SearchDirection::as_str),
    )?;
    result.set_item("dropout_rate", solution.dropout_rate)?;
    result.set_item("sample_size", solution.sample_size())?;
    result.set_item("size_include_dropouts", solution.size_include_dropouts)?;
    Ok(result.into())
}

/// Solve a two-sample proportion design.
///
/// With every numeric argument given, the group sizes are solved for and
/// returned as a `(treatment, reference)` pair rounded up to whole subjects.
#[pyfunction]
#[pyo3(name = "two_proportion", signature = (
    alpha=None,
    power=None,
    treatment_proportion=None,
    reference_proportion=None,
    alternative="TWO_SIDED",
    test_type="Z_TEST_POOLED",
    group_allocation=None,
    search_direction=None,
    dropout_rate=0.0,
    full_output=false,
))]
#[allow(clippy::too_many_arguments)]
fn solve_two_proportion(
    py: Python<'_>,
    alpha: Option<f64>,
    power: Option<f64>,
    treatment_proportion: Option<f64>,
    reference_proportion: Option<f64>,
    alternative: &str,
    test_type: &str,
    group_allocation: Option<&PyDict>,
    search_direction: Option<&str>,
    dropout_rate: f64,
    full_output: bool,
) -> PyResult<PyObject> {
    let mut design = TwoProportion::new()
        .alpha(alpha)
        .power(power)
        .treatment_proportion(treatment_proportion)
        .reference_proportion(reference_proportion)
        .alternative(parse::<Alternative>(alternative)?)
        .test_type(parse::<TwoProportionTest>(test_type)?)
        .group_allocation(parse_allocation(group_allocation)?)
        .dropout_rate(dropout_rate);
    if let Some(direction) = parse_direction(search_direction)? {
        design = design.search_direction(direction);
    }
    let solution = design.solve().map_err(to_py_err)?;

    if full_output {
        two_proportion_record(py, &solution)
    } else if solution.target == TwoProportionTarget::Size {
        Ok(solution.sample_sizes().into_py(py))
    } else {
        Ok(solution.value().into_py(py))
    }
}

fn two_proportion_record(py: Python<'_>, solution: &TwoProportionSolution) -> PyResult<PyObject> {
    let result = PyDict::new(py);
    result.set_item("target", solution.target.as_str())?;
    result.set_item("value", solution.value())?;
    result.set_item("sizes", (solution.treatment_size, solution.reference_size))?;
    result.set_item("alpha", solution.alpha)?;
    result.set_item("power", solution.power)?;
    result.set_item("treatment_proportion", solution.treatment_proportion)?;
    result.set_item("reference_proportion", solution.reference_proportion)?;
    result.set_item("alternative", solution.alternative.as_str())?;
    result.set_item("test_type", solution.test_type.as_str())?;
    result.set_item(
        "search_direction",
        solution.search_direction.map(SearchDirection::as_str),
    )?;
    result.set_item("dropout_rate", solution.dropout_rate)?;
    result.set_item("sample_sizes", solution.sample_sizes())?;
    result.set_item("sizes_include_dropouts", solution.sizes_include_dropouts())?;
    Ok(result.into())
}

/// The statpower Python module.
#[pymodule]
fn statpower(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(solve_one_proportion, m)?)?;
    m.add_function(wrap_pyfunction!(solve_two_proportion, m)?)?;
    Ok(())
}
