use crate::config::support_count;
use crate::data::transactions_from_matrix;
use crate::fp::{DuplicatePolicy, FpGrowth, FrequentItemsets, Item, Itemset, MiningError};
use crate::rules::{association_rules, RuleThresholds};
use numpy::PyReadonlyArray2;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

type PyRule = (Vec<String>, Vec<String>, f64, f64, f64, f64);

fn mining_error(err: MiningError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

fn to_python<T: Item>(itemsets: FrequentItemsets<T>) -> Vec<(Vec<T>, usize)> {
    itemsets
        .into_iter()
        .map(|(itemset, count)| (itemset.into_vec(), count))
        .collect()
}

#[pyfunction]
#[pyo3(name = "fp_growth", signature = (transactions, min_support_count, dedupe = false))]
fn fp_growth_py(
    py: Python<'_>,
    transactions: Vec<Vec<String>>,
    min_support_count: usize,
    dedupe: bool,
) -> PyResult<Vec<(Vec<String>, usize)>> {
    let policy = if dedupe {
        DuplicatePolicy::DedupePerTransaction
    } else {
        DuplicatePolicy::CountEachOccurrence
    };
    let itemsets = py
        .allow_threads(|| {
            FpGrowth::new(min_support_count)
                .duplicates(policy)
                .mine(&transactions)
        })
        .map_err(mining_error)?;
    Ok(to_python(itemsets))
}

#[pyfunction]
#[pyo3(name = "fp_growth_dense")]
fn fp_growth_dense_py(
    py: Python<'_>,
    transactions: PyReadonlyArray2<'_, i32>,
    min_support: f64,
) -> PyResult<Vec<(Vec<usize>, usize)>> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(PyValueError::new_err(format!(
            "min_support must be in (0, 1], got {}",
            min_support
        )));
    }
    let rows = transactions_from_matrix(transactions.as_array());
    let min_count = support_count(min_support, rows.len());
    let itemsets = py
        .allow_threads(|| FpGrowth::new(min_count).mine(&rows))
        .map_err(mining_error)?;
    Ok(to_python(itemsets))
}

#[pyfunction]
#[pyo3(
    name = "association_rules",
    signature = (
        itemsets,
        total_transactions,
        min_confidence,
        min_lift = 1.0,
        min_quality_score = 0.0,
        max_rules = None
    )
)]
fn association_rules_py(
    py: Python<'_>,
    itemsets: Vec<(Vec<String>, usize)>,
    total_transactions: usize,
    min_confidence: f64,
    min_lift: f64,
    min_quality_score: f64,
    max_rules: Option<usize>,
) -> PyResult<Vec<PyRule>> {
    let itemsets: FrequentItemsets<String> = itemsets
        .into_iter()
        .map(|(items, count)| (Itemset::new(items), count))
        .collect();
    let thresholds = RuleThresholds {
        min_confidence,
        min_lift,
        min_quality_score,
        max_rules,
    };

    let rules = py.allow_threads(|| association_rules(&itemsets, total_transactions, &thresholds));
    Ok(rules
        .into_iter()
        .map(|rule| {
            (
                rule.antecedent.into_vec(),
                rule.consequent.into_vec(),
                rule.support,
                rule.confidence,
                rule.lift,
                rule.quality_score,
            )
        })
        .collect())
}

#[pymodule]
fn fprules(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fp_growth_py, m)?)?;
    m.add_function(wrap_pyfunction!(fp_growth_dense_py, m)?)?;
    m.add_function(wrap_pyfunction!(association_rules_py, m)?)?;
    Ok(())
}
