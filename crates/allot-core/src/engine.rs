//! Allocation engine
//!
//! One run reads a consistent data snapshot and then computes purely in memory:
//! eligibility → store-count filter → per model, per color: factor scoring →
//! relative normalization → proportional allocation → aggregation.
//!
//! The engine holds no per-run state. The score cache is the only thing shared
//! between runs, and a miss only costs a recomputation.

use crate::aggregation::{Aggregator, ColorAllocation, ModelAllocation};
use crate::cache::{
    CacheStats, ColorScores, NoopScoreCache, ScoreCache, TtlScoreCache, fingerprint,
};
use crate::config::EngineConfig;
use crate::eligibility::resolve_eligible;
use crate::error::{AllotError, AllotResult};
use crate::factors::FactorCalculator;
use crate::normalizer::normalize;
use crate::snapshot::{DataSnapshot, DataSource};
use crate::store_filter::{StoreFilterOutcome, StoreIndex, apply_store_filter};
use allot_calculator::ProportionalAllocator;
use allot_types::{Agent, Allocation, AllocationRequest, AssignmentSettings, PhoneModel, WeightedAgent};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AllocationEngine {
    config: EngineConfig,
    cache: Arc<dyn ScoreCache>,
}

impl AllocationEngine {
    /// Create an engine with the cache described by `config`
    pub fn new(config: EngineConfig) -> AllotResult<Self> {
        config.validate()?;
        let cache: Arc<dyn ScoreCache> = if config.cache.enabled {
            Arc::new(TtlScoreCache::new(config.cache.max_entries))
        } else {
            Arc::new(NoopScoreCache::default())
        };
        Ok(Self { config, cache })
    }

    /// Create an engine around a caller-supplied cache
    pub fn with_cache(config: EngineConfig, cache: Arc<dyn ScoreCache>) -> AllotResult<Self> {
        config.validate()?;
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Reject requests the engine cannot interpret. Empty rosters, empty catalogs
    /// and zero quantities are valid and simply allocate nothing. The catalog's
    /// overall quantity must fit in a `u64`, which bounds every total the
    /// aggregation computes.
    pub fn validate_request(request: &AllocationRequest) -> AllotResult<()> {
        for (name, value) in request.settings.ratios.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(AllotError::validation(
                    &format!("settings.ratios.{name}"),
                    format!("ratio {name} must be a finite non-negative number, got {value}"),
                ));
            }
        }

        let mut models = HashSet::new();
        let mut catalog_total: u64 = 0;
        for model in &request.catalog {
            if !models.insert(model.model_name.as_str()) {
                return Err(AllotError::validation(
                    "catalog",
                    format!("model {} is listed more than once", model.model_name),
                ));
            }

            let mut colors = HashSet::new();
            for color in &model.colors {
                if !colors.insert(color.color_name.as_str()) {
                    return Err(AllotError::validation(
                        &format!("catalog.{}.colors", model.model_name),
                        format!("color {} is listed more than once", color.color_name),
                    ));
                }
            }

            catalog_total = model
                .checked_total_quantity()
                .and_then(|units| catalog_total.checked_add(units))
                .ok_or_else(|| {
                    AllotError::validation(
                        &format!("catalog.{}", model.model_name),
                        format!("total quantity overflows at model {}", model.model_name),
                    )
                })?;
        }

        Ok(())
    }

    /// Fetch a snapshot from `source` and allocate against it.
    /// A failing fetch fails the whole run; no partial result is returned.
    #[instrument(
        skip_all,
        fields(
            run_id = %Uuid::new_v4(),
            data_source = source.name(),
            roster = request.roster.len(),
            models = request.catalog.len(),
        )
    )]
    pub async fn allocate(
        &self,
        request: &AllocationRequest,
        source: &dyn DataSource,
    ) -> AllotResult<Allocation> {
        Self::validate_request(request)?;
        let snapshot = DataSnapshot::gather(source).await?;
        self.run(request, &snapshot)
    }

    /// Allocate against a snapshot that was already gathered
    pub fn allocate_snapshot(
        &self,
        request: &AllocationRequest,
        snapshot: &DataSnapshot,
    ) -> AllotResult<Allocation> {
        Self::validate_request(request)?;
        self.run(request, snapshot)
    }

    /// Whole-model weights of the eligible agents, without allocating anything
    #[instrument(skip(self, request, snapshot))]
    pub fn preview_scores(
        &self,
        request: &AllocationRequest,
        snapshot: &DataSnapshot,
        model_name: &str,
    ) -> AllotResult<Vec<WeightedAgent>> {
        Self::validate_request(request)?;
        if !request.catalog.iter().any(|m| m.model_name == model_name) {
            return Err(AllotError::validation(
                "model",
                format!("model {model_name} is not in the catalog"),
            ));
        }

        let index = StoreIndex::from_ownership(&snapshot.stores);
        let StoreFilterOutcome { kept, .. } =
            apply_store_filter(resolve_eligible(&request.roster, &request.settings.targets), &index);

        let calculator = FactorCalculator::new(snapshot, &index);
        let scores = calculator.score_all(&kept, model_name, None);
        Ok(normalize(&scores, &request.settings))
    }

    fn run(&self, request: &AllocationRequest, snapshot: &DataSnapshot) -> AllotResult<Allocation> {
        let settings = &request.settings;
        if settings.ratios.total() == 0.0 {
            warn!("All factor ratios are zero; every color falls back to the tie-break order");
        }

        let index = StoreIndex::from_ownership(&snapshot.stores);
        let eligible = resolve_eligible(&request.roster, &settings.targets);
        let StoreFilterOutcome { kept, excluded } = apply_store_filter(eligible, &index);

        if kept.is_empty() {
            info!(excluded = excluded.len(), "No eligible agents; nothing to allocate");
            return Ok(Allocation::default());
        }

        info!(
            eligible = kept.len(),
            excluded = excluded.len(),
            models = request.catalog.len(),
            parallel = self.config.parallel_models,
            "Allocating"
        );

        let calculator = FactorCalculator::new(snapshot, &index);
        let data_tag = snapshot.data_tag()?;
        let allocate =
            |model: &PhoneModel| self.allocate_model(model, &kept, settings, &calculator, &data_tag);

        let models: Vec<ModelAllocation> = if self.config.parallel_models {
            request.catalog.par_iter().map(allocate).collect::<AllotResult<_>>()?
        } else {
            request.catalog.iter().map(allocate).collect::<AllotResult<_>>()?
        };

        Ok(Aggregator.aggregate(&kept, &models, excluded))
    }

    fn allocate_model(
        &self,
        model: &PhoneModel,
        agents: &[Agent],
        settings: &AssignmentSettings,
        calculator: &FactorCalculator<'_>,
        data_tag: &str,
    ) -> AllotResult<ModelAllocation> {
        let scores = self.model_scores(model, agents, settings, calculator, data_tag)?;
        let allocator = ProportionalAllocator;

        let colors = model
            .colors
            .iter()
            .map(|variant| {
                let raw = match scores.get(&variant.color_name) {
                    Some(cached) => Cow::Borrowed(cached.as_slice()),
                    None => Cow::Owned(calculator.score_all(
                        agents,
                        &model.model_name,
                        Some(variant.color_name.as_str()),
                    )),
                };

                let weights = normalize(&raw, settings);
                let entries: Vec<(&str, f64)> =
                    weights.iter().map(|w| (w.agent_id.as_str(), w.weight)).collect();
                let outcome = allocator.allocate(&entries, variant.quantity);

                debug!(
                    model = %model.model_name,
                    color = %variant.color_name,
                    quantity = variant.quantity,
                    agent_count = weights.len(),
                    base_total = outcome.base_total,
                    remainder = outcome.remainder,
                    "Allocated color"
                );

                ColorAllocation {
                    color_name: variant.color_name.clone(),
                    quantity: variant.quantity,
                    weights,
                    units: outcome.units,
                }
            })
            .collect();

        Ok(ModelAllocation { model_name: model.model_name.clone(), colors })
    }

    /// Raw per-color scores of one model, served from the cache when possible
    fn model_scores(
        &self,
        model: &PhoneModel,
        agents: &[Agent],
        settings: &AssignmentSettings,
        calculator: &FactorCalculator<'_>,
        data_tag: &str,
    ) -> AllotResult<Arc<ColorScores>> {
        let key = fingerprint(
            agents.iter().map(|a| (a.agent_id.as_str(), a.display_name.as_str())),
            settings,
            &model.model_name,
            data_tag,
        )?;

        if let Some(hit) = self.cache.get(&key) {
            debug!(model = %model.model_name, cache_hit = true, "Reusing cached scores");
            return Ok(hit);
        }

        let scores: ColorScores = model
            .colors
            .iter()
            .map(|variant| {
                let color = variant.color_name.as_str();
                (variant.color_name.clone(), calculator.score_all(agents, &model.model_name, Some(color)))
            })
            .collect();
        let scores = Arc::new(scores);

        debug!(model = %model.model_name, cache_hit = false, colors = scores.len(), "Scored model");
        self.cache.set(key, Arc::clone(&scores), self.config.cache.ttl());
        Ok(scores)
    }
}
