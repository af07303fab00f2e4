//! Comparison planning
//!
//! Lays the runs out on a shared panel grid and computes every field a
//! panel needs. Static fields (objective, constraint boundaries) are sampled
//! once and shared between panels; merit fields are sampled per iteration
//! from that iteration's `(λ, Σ)`.

use std::sync::Arc;

use tracing::{debug, info};

use meritscope_numerical::{sample_domain, MeritFunction};
use meritscope_trace::{normalize, OptimizerRun};
use meritscope_types::{Domain, DualState, ScalarField2D, VizError, VizResult};

/// Runs selected for display plus the shared axes and contour levels
#[derive(Debug, Clone)]
pub struct ComparisonDataset {
    runs: Vec<OptimizerRun>,
    domain: Domain,
    levels: Vec<f64>,
}

impl ComparisonDataset {
    pub fn new(runs: Vec<OptimizerRun>, domain: Domain, levels: Vec<f64>) -> VizResult<Self> {
        domain.validate()?;
        if runs.is_empty() {
            return Err(VizError::invalid_domain("comparison needs at least one run"));
        }
        Ok(Self {
            runs,
            domain,
            levels,
        })
    }

    /// The usual side-by-side comparison of two solver variants.
    pub fn pair(first: OptimizerRun, second: OptimizerRun, domain: Domain, levels: Vec<f64>) -> VizResult<Self> {
        Self::new(vec![first, second], domain, levels)
    }

    pub fn runs(&self) -> &[OptimizerRun] {
        &self.runs
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Panel grid width: the longest run's iteration count.
    pub fn columns(&self) -> usize {
        self.runs.iter().map(OptimizerRun::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    /// Draw ψ for each iteration's duals instead of the plain objective.
    pub show_merit_field: bool,
    pub step: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            show_merit_field: false,
            step: 0.025,
        }
    }
}

/// One constraint level curve `g_i(x, y) = level`
#[derive(Debug, Clone)]
pub struct Boundary {
    pub constraint: usize,
    pub level: f64,
    pub field: Arc<ScalarField2D>,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub iteration: usize,
    pub title: String,
    pub field: Arc<ScalarField2D>,
    pub trajectory: Vec<[f64; 2]>,
    pub dual: DualState,
}

#[derive(Debug, Clone)]
pub enum PanelSlot {
    Active(Panel),
    /// Past the end of a shorter run
    Disabled,
}

impl PanelSlot {
    pub fn is_active(&self) -> bool {
        matches!(self, PanelSlot::Active(_))
    }
}

/// Everything a renderer needs, in emission order
#[derive(Debug, Clone)]
pub struct FigurePlan {
    pub domain: Domain,
    pub levels: Vec<f64>,
    pub boundaries: Vec<Boundary>,
    pub row_labels: Vec<String>,
    /// `rows[r][c]`: run `r`, outer iteration `c`
    pub rows: Vec<Vec<PanelSlot>>,
}

impl FigurePlan {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Row-major iteration over `(row, column, slot)`.
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize, &PanelSlot)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, slot)| (r, c, slot)))
    }
}

pub fn plan(dataset: &ComparisonDataset, merit: &MeritFunction, options: &PlanOptions) -> VizResult<FigurePlan> {
    let domain = dataset.domain();
    let problem = merit.problem();

    let objective_field = Arc::new(sample_domain(problem.objective, domain, options.step)?);
    let boundaries = boundaries(merit, domain, options.step)?;

    let columns = dataset.columns();
    let mut rows = Vec::with_capacity(dataset.runs().len());
    for run in dataset.runs() {
        let mut row = Vec::with_capacity(columns);
        for iteration in 0..columns {
            let Some(record) = run.get(iteration) else {
                row.push(PanelSlot::Disabled);
                continue;
            };
            let normalized = normalize(record).map_err(|err| err.at_iteration(iteration))?;
            let field = if options.show_merit_field {
                Arc::new(merit.sample(domain, options.step, &normalized.dual)?)
            } else {
                Arc::clone(&objective_field)
            };
            row.push(PanelSlot::Active(Panel {
                iteration,
                title: format!("inner it: {}", normalized.inner_iterations()),
                field,
                trajectory: normalized.trajectory,
                dual: normalized.dual,
            }));
        }
        debug!(run = %run.label, iterations = run.len(), disabled = columns - run.len(), "planned row");
        rows.push(row);
    }

    info!(
        rows = rows.len(),
        columns,
        show_merit_field = options.show_merit_field,
        "planned comparison figure"
    );

    Ok(FigurePlan {
        domain: *domain,
        levels: dataset.levels().to_vec(),
        boundaries,
        row_labels: dataset.runs().iter().map(|run| run.label.clone()).collect(),
        rows,
    })
}

/// Level curves for every finite box bound of both constraints.
fn boundaries(merit: &MeritFunction, domain: &Domain, step: f64) -> VizResult<Vec<Boundary>> {
    let bounds = merit.bounds();
    let mut out = Vec::new();
    for (i, constraint) in merit.problem().constraints.iter().enumerate() {
        let levels: Vec<f64> = [bounds.upper()[i], bounds.lower()[i]]
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        if levels.is_empty() {
            continue;
        }
        let field = Arc::new(sample_domain(*constraint, domain, step)?);
        for level in levels {
            out.push(Boundary {
                constraint: i,
                level,
                field: Arc::clone(&field),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritscope_trace::{InnerIterate, IterationRecord};
    use meritscope_types::BoxConstraint;

    fn record(points: &[(f64, f64)], lambda: [f64; 2], sigma: [f64; 2]) -> IterationRecord {
        IterationRecord {
            inner: Some(points.iter().map(|&(x, y)| InnerIterate::at(x, y)).collect()),
            lambda: Some(lambda.to_vec()),
            sigma: Some(sigma.to_vec()),
        }
    }

    fn run(label: &str, len: usize) -> OptimizerRun {
        let records = (0..len)
            .map(|k| record(&[(1.0, 1.0), (1.0 + k as f64 * 0.1, 1.0)], [0.1 * k as f64, 0.0], [1.0, 1.0]))
            .collect();
        OptimizerRun::new(label, records)
    }

    fn options() -> PlanOptions {
        PlanOptions {
            show_merit_field: false,
            step: 0.5,
        }
    }

    #[test]
    fn test_dataset_columns_is_longest_run() {
        let dataset = ComparisonDataset::pair(run("a", 5), run("b", 3), Domain::default(), vec![1.0]).unwrap();
        assert_eq!(dataset.columns(), 5);
    }

    #[test]
    fn test_dataset_requires_runs_and_valid_domain() {
        assert!(ComparisonDataset::new(vec![], Domain::default(), vec![]).is_err());

        let mut domain = Domain::default();
        domain.x.max = domain.x.min;
        assert!(matches!(
            ComparisonDataset::pair(run("a", 1), run("b", 1), domain, vec![]),
            Err(VizError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_shorter_run_gets_disabled_slots() {
        let dataset = ComparisonDataset::pair(run("a", 5), run("b", 3), Domain::default(), vec![1.0]).unwrap();
        let plan = plan(&dataset, &MeritFunction::default(), &options()).unwrap();

        assert_eq!(plan.row_count(), 2);
        assert_eq!(plan.column_count(), 5);
        assert!(plan.rows[0].iter().all(PanelSlot::is_active));
        let active: Vec<bool> = plan.rows[1].iter().map(PanelSlot::is_active).collect();
        assert_eq!(active, vec![true, true, true, false, false]);
        assert_eq!(plan.row_labels, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_slots_are_row_major_in_iteration_order() {
        let dataset = ComparisonDataset::pair(run("a", 2), run("b", 2), Domain::default(), vec![]).unwrap();
        let plan = plan(&dataset, &MeritFunction::default(), &options()).unwrap();
        let order: Vec<(usize, usize)> = plan.slots().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        for (_, c, slot) in plan.slots() {
            match slot {
                PanelSlot::Active(panel) => {
                    assert_eq!(panel.iteration, c);
                    assert_eq!(panel.title, "inner it: 2");
                }
                PanelSlot::Disabled => panic!("Expected Active panel"),
            }
        }
    }

    #[test]
    fn test_objective_field_is_shared() {
        let dataset = ComparisonDataset::pair(run("a", 2), run("b", 1), Domain::default(), vec![]).unwrap();
        let plan = plan(&dataset, &MeritFunction::default(), &options()).unwrap();
        let fields: Vec<&Arc<ScalarField2D>> = plan
            .slots()
            .filter_map(|(_, _, slot)| match slot {
                PanelSlot::Active(panel) => Some(&panel.field),
                PanelSlot::Disabled => None,
            })
            .collect();
        assert_eq!(fields.len(), 3);
        assert!(fields.windows(2).all(|w| Arc::ptr_eq(w[0], w[1])));
    }

    #[test]
    fn test_merit_fields_follow_iteration_duals() {
        let dataset = ComparisonDataset::pair(run("a", 2), run("b", 1), Domain::default(), vec![]).unwrap();
        let merit = MeritFunction::default();
        let opts = PlanOptions {
            show_merit_field: true,
            step: 0.5,
        };
        let plan = plan(&dataset, &merit, &opts).unwrap();
        match &plan.rows[0][1] {
            PanelSlot::Active(panel) => {
                let expected = merit.sample(&Domain::default(), 0.5, &panel.dual).unwrap();
                assert_eq!(*panel.field, expected);
                assert_eq!(panel.dual, DualState::new([0.1, 0.0], [1.0, 1.0]));
            }
            PanelSlot::Disabled => panic!("Expected Active panel"),
        }
    }

    #[test]
    fn test_boundaries_use_finite_bounds() {
        let dataset = ComparisonDataset::pair(run("a", 1), run("b", 1), Domain::default(), vec![]).unwrap();
        let plan = plan(&dataset, &MeritFunction::default(), &options()).unwrap();
        let levels: Vec<(usize, f64)> = plan.boundaries.iter().map(|b| (b.constraint, b.level)).collect();
        assert_eq!(levels, vec![(0, -1.0), (1, 0.0)]);

        let two_sided = BoxConstraint::new([-3.0, f64::NEG_INFINITY], [-1.0, 0.0]).unwrap();
        let merit = MeritFunction::new(*MeritFunction::default().problem(), two_sided);
        let plan = super::plan(&dataset, &merit, &options()).unwrap();
        assert_eq!(plan.boundaries.len(), 3);
    }

    #[test]
    fn test_malformed_record_aborts_plan() {
        let mut broken = run("b", 3);
        broken.records[1].sigma = None;
        let dataset = ComparisonDataset::pair(run("a", 3), broken, Domain::default(), vec![]).unwrap();
        let err = plan(&dataset, &MeritFunction::default(), &options()).unwrap_err();
        assert!(matches!(err, VizError::MalformedRecord { index: Some(1), .. }));
    }

    #[test]
    fn test_invalid_step_aborts_plan() {
        let dataset = ComparisonDataset::pair(run("a", 1), run("b", 1), Domain::default(), vec![]).unwrap();
        let opts = PlanOptions {
            show_merit_field: false,
            step: 0.0,
        };
        assert!(matches!(
            plan(&dataset, &MeritFunction::default(), &opts),
            Err(VizError::InvalidDomain { .. })
        ));
    }
}
