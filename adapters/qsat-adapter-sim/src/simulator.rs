//! Simulator backend implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use qsat_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use qsat_ir::{Circuit, QubitId};

use crate::statevector::Statevector;

/// Default qubit limit. A 24-qubit state takes 256 MiB.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Hard qubit limit regardless of configuration.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Default shot limit per job.
pub const DEFAULT_MAX_SHOTS: u32 = 1_000_000;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator.
///
/// Each job evolves the state once and then draws every shot from the final
/// distribution, which is exact because measurements may only come last.
/// With a seed, the `k`-th submitted job samples with `seed + k`, so a
/// sequence of jobs is reproducible.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    max_qubits: u32,
    seed: Option<u64>,
    submitted: AtomicU64,
}

impl SimulatorBackend {
    /// Create an unseeded simulator with default limits.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            DEFAULT_MAX_QUBITS,
            DEFAULT_MAX_SHOTS,
            None,
        )
    }

    /// Create a simulator with a custom qubit limit, capped at
    /// [`MAX_SUPPORTED_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new("simulator"),
            max_qubits.min(MAX_SUPPORTED_QUBITS),
            DEFAULT_MAX_SHOTS,
            None,
        )
    }

    /// Make sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn build(config: BackendConfig, max_qubits: u32, max_shots: u32, seed: Option<u64>) -> Self {
        let capabilities = Capabilities::simulator(max_qubits)
            .with_name(config.name.clone())
            .with_max_shots(max_shots);
        Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            max_qubits,
            seed,
            submitted: AtomicU64::new(0),
        }
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Reasons the circuit cannot run here, empty when it can.
    fn check(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = Vec::new();
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits as usize {
            reasons.push(format!(
                "circuit has {num_qubits} qubits but simulator supports {}",
                self.max_qubits
            ));
        }
        if let Some(q) = circuit.qubits().iter().find(|q| q.id.index() >= num_qubits) {
            reasons.push(format!("qubit {} is outside the register", q.id));
        }

        let mut measured: FxHashSet<QubitId> = FxHashSet::default();
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !self.capabilities.gate_set.supports(gate) {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
                if let Some(q) = inst.qubits.iter().find(|q| measured.contains(q)) {
                    reasons.push(format!(
                        "gate '{}' acts on {q} after it was measured",
                        gate.name()
                    ));
                }
            } else if inst.is_measure() {
                measured.extend(inst.qubits.iter().copied());
            }
        }
        reasons
    }

    /// Evolve the state and draw `shots` outcomes.
    #[allow(clippy::cast_possible_truncation)]
    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32, job_index: u64) -> ExecutionResult {
        let start = Instant::now();

        let mut sv = Statevector::new(circuit.num_qubits());
        let mut readout: Vec<(usize, usize)> = Vec::new();
        for inst in circuit.instructions() {
            if inst.is_measure() {
                readout.extend(
                    inst.qubits
                        .iter()
                        .zip(&inst.clbits)
                        .map(|(q, c)| (q.index(), c.0 as usize)),
                );
            } else {
                sv.apply(inst);
            }
        }
        sv.apply_global_phase(circuit.global_phase());
        debug!(ops = circuit.size(), "state evolved");

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(job_index)),
            None => StdRng::from_entropy(),
        };
        let samples = sv.sample_counts(&mut rng, shots);

        let mut counts = Counts::new();
        for (outcome, n) in samples {
            let bits = if readout.is_empty() {
                sv.outcome_to_bitstring(outcome)
            } else {
                clbit_string(outcome, &readout, circuit.num_clbits())
            };
            counts.insert(bits, n);
        }

        let elapsed = start.elapsed();
        debug!(?elapsed, outcomes = counts.len(), "simulation completed");

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

/// Read measured qubits into classical bits, clbit 0 leftmost.
fn clbit_string(outcome: usize, readout: &[(usize, usize)], num_clbits: usize) -> String {
    let mut bits = vec!['0'; num_clbits];
    for &(qubit, clbit) in readout {
        if clbit < num_clbits {
            bits[clbit] = if (outcome >> qubit) & 1 == 1 { '1' } else { '0' };
        }
    }
    bits.into_iter().collect()
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        Ok(ValidationResult::from_reasons(self.check(circuit)))
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, simulator accepts 1..={}",
                self.capabilities.max_shots
            )));
        }
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        let reasons = self.check(circuit);
        if !reasons.is_empty() {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job_index = self.submitted.fetch_add(1, Ordering::Relaxed);
        let job = Job::new(job_id.clone(), shots).with_backend(self.config.name.clone());
        self.lock_jobs()
            .insert(job_id.0.clone(), SimJob { job, result: None });
        debug!(job = %job_id, index = job_index, "submitted job");

        {
            let mut jobs = self.lock_jobs();
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.job.transition(JobStatus::Running)?;
            }
        }

        let result = self.run_simulation(circuit, shots, job_index);

        let mut jobs = self.lock_jobs();
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            // A cancel that landed while running wins.
            if sim_job.job.status.is_pending() {
                sim_job.job.transition(JobStatus::Completed)?;
                sim_job.result = Some(result);
            } else {
                warn!(job = %job_id, status = %sim_job.job.status, "dropping result");
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.lock_jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.lock_jobs();
        let status = jobs
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !status.is_terminal() {
            return Err(HalError::Backend(format!(
                "job {job_id} has no result yet ({status})"
            )));
        }

        // Finished jobs are handed out once and then forgotten.
        let Some(sim_job) = jobs.remove(&job_id.0) else {
            return Err(HalError::JobNotFound(job_id.0.clone()));
        };
        debug!(job = %job_id, remaining = jobs.len(), "evicted finished job");
        match (sim_job.job.status, sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg)),
            (JobStatus::Completed, None) => Err(HalError::Backend(format!(
                "job {job_id} completed without a result"
            ))),
            _ => Err(HalError::JobCancelled),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if sim_job.job.status.is_terminal() {
            debug!(job = %job_id, status = %sim_job.job.status, "cancel of finished job ignored");
            return Ok(());
        }
        sim_job.job.transition(JobStatus::Cancelled)
    }
}

impl BackendFactory for SimulatorBackend {
    /// Recognised settings: `max_qubits`, `max_shots`, `seed`.
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.get_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| (1..=MAX_SUPPORTED_QUBITS).contains(n))
                .ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_qubits must be in 1..={MAX_SUPPORTED_QUBITS}, got {n}"
                    ))
                })?,
        };
        let max_shots = match config.get_u64("max_shots")? {
            None => DEFAULT_MAX_SHOTS,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    HalError::Configuration(format!("max_shots must be in 1..=u32::MAX, got {n}"))
                })?,
        };
        let seed = config.get_u64("seed")?;
        Ok(Self::build(config, max_qubits, max_shots, seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsat_ir::ClbitId;

    fn bell() -> Circuit {
        let mut c = Circuit::with_size("bell", 2, 0);
        c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c.measure_all().unwrap();
        c
    }

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
        assert!(backend.availability().await.unwrap().is_available);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(1);
        let job_id = backend.submit(&bell(), 1000).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);
        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert!(counts.get("00") > 0 && counts.get("11") > 0);
    }

    #[tokio::test]
    async fn test_partial_measurement_reads_clbits() {
        let mut c = Circuit::with_size("partial", 3, 2);
        c.x(QubitId(2)).unwrap();
        c.measure(QubitId(2), ClbitId(0)).unwrap();
        c.measure(QubitId(0), ClbitId(1)).unwrap();
        let backend = SimulatorBackend::new();
        let result = backend.run(&c, 10).await.unwrap();
        assert_eq!(result.counts.get("10"), 10);
    }

    #[tokio::test]
    async fn test_unmeasured_circuit_reports_all_qubits() {
        let mut c = Circuit::with_size("plain", 3, 0);
        c.x(QubitId(0)).unwrap();
        let backend = SimulatorBackend::new();
        let result = backend.run(&c, 5).await.unwrap();
        assert_eq!(result.counts.get("100"), 5);
    }

    #[tokio::test]
    async fn test_seeded_jobs_are_reproducible() {
        let mut c = Circuit::with_size("uniform", 3, 0);
        c.apply_all(qsat_ir::StandardGate::H).unwrap();

        let a = SimulatorBackend::new().with_seed(99);
        let b = SimulatorBackend::new().with_seed(99);
        let first_a = a.run(&c, 200).await.unwrap().counts;
        let second_a = a.run(&c, 200).await.unwrap().counts;
        let first_b = b.run(&c, 200).await.unwrap().counts;
        let second_b = b.run(&c, 200).await.unwrap().counts;
        assert_eq!(first_a, first_b);
        assert_eq!(second_a, second_b);
        assert_ne!(first_a, second_a);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);
        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
        assert!(!backend.validate(&circuit).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_invalid_shots() {
        let backend = SimulatorBackend::new();
        assert!(matches!(
            backend.submit(&bell(), 0).await,
            Err(HalError::InvalidShots(_))
        ));
        assert!(matches!(
            backend.submit(&bell(), DEFAULT_MAX_SHOTS + 1).await,
            Err(HalError::InvalidShots(_))
        ));
    }

    #[tokio::test]
    async fn test_gate_after_measurement_rejected() {
        let mut c = Circuit::with_size("mid", 1, 1);
        c.measure(QubitId(0), ClbitId(0)).unwrap();
        c.x(QubitId(0)).unwrap();
        let backend = SimulatorBackend::new();
        match backend.validate(&c).await.unwrap() {
            ValidationResult::Invalid { reasons } => {
                assert!(reasons[0].contains("after it was measured"));
            }
            ValidationResult::Valid => panic!("mid-circuit measurement accepted"),
        }
        assert!(matches!(
            backend.submit(&c, 1).await,
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_completed_job_keeps_result() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&bell(), 10).await.unwrap();
        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert!(backend.result(&job_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_result_evicts_finished_job() {
        let backend = SimulatorBackend::new().with_seed(3);
        let job_id = backend.submit(&bell(), 20).await.unwrap();
        assert_eq!(backend.lock_jobs().len(), 1);

        assert_eq!(backend.result(&job_id).await.unwrap().shots, 20);
        assert!(backend.lock_jobs().is_empty());
        assert!(matches!(
            backend.status(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.result(&job_id).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_repeated_runs_leave_no_jobs_behind() {
        let backend = SimulatorBackend::new();
        for _ in 0..5 {
            backend.run(&bell(), 10).await.unwrap();
        }
        assert!(backend.lock_jobs().is_empty());
    }

    #[test]
    fn test_max_qubits_capped() {
        let backend = SimulatorBackend::with_max_qubits(40);
        assert_eq!(backend.capabilities().num_qubits, MAX_SUPPORTED_QUBITS);
        assert_eq!(
            SimulatorBackend::with_max_qubits(8).capabilities().num_qubits,
            8
        );
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local")
            .with_extra("max_qubits", serde_json::json!(12))
            .with_extra("seed", serde_json::json!(5));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.capabilities().num_qubits, 12);
        assert_eq!(backend.seed(), Some(5));

        let too_big =
            BackendConfig::new("x").with_extra("max_qubits", serde_json::json!(64));
        assert!(matches!(
            SimulatorBackend::from_config(too_big),
            Err(HalError::Configuration(_))
        ));
    }
}
