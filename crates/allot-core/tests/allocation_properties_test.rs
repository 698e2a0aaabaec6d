use allot_core::{
    ActivityRecord, Agent, AllocationEngine, AllocationRequest, AssignmentSettings, CacheConfig,
    ColorVariant, DataSnapshot, EngineConfig, InventoryRow, PhoneModel, Ratios, StockStatus,
    StoreOwnership, Targets,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct AgentFigures {
    sales: u64,
    inventory: u64,
    stores: u8,
}

fn figures() -> impl Strategy<Value = AgentFigures> {
    (0u64..80, 0u64..80, 0u8..4).prop_map(|(sales, inventory, stores)| AgentFigures {
        sales,
        inventory,
        stores,
    })
}

fn ratios() -> impl Strategy<Value = Ratios> {
    (0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0, 0.0f64..100.0).prop_map(|(t, s, r, v)| Ratios {
        turnover_rate: t,
        store_count: s,
        remaining_inventory: r,
        sales_volume: v,
    })
}

fn build(agents: &[AgentFigures], ratios: Ratios, quantities: &[u64]) -> (AllocationRequest, DataSnapshot) {
    let mut targets = Targets::default();
    let mut roster = Vec::new();
    let mut snapshot = DataSnapshot::default();

    for (i, figures) in agents.iter().enumerate() {
        let id = format!("agent-{i:02}");
        let name = format!("Agent {i}");
        targets.agents.insert(id.clone(), true);
        roster.push(Agent::new(id.clone(), name.clone(), "Office", "Dept"));

        for s in 0..figures.stores {
            let store = format!("store-{i}-{s}");
            snapshot.stores.push(StoreOwnership { store_name: store.clone(), agent_name: name.clone() });
            if s == 0 && figures.inventory > 0 {
                snapshot.inventory.push(InventoryRow {
                    store_name: store,
                    model_name: "M".into(),
                    color_name: Some("C0".into()),
                    quantity: figures.inventory,
                    status: StockStatus::Normal,
                });
            }
        }
        if figures.sales > 0 {
            snapshot.current_activity.push(ActivityRecord {
                agent_id: id,
                model_name: "M".into(),
                color_name: Some("C0".into()),
                activation_count: figures.sales,
                store_name: String::new(),
                is_prepaid: false,
            });
        }
    }

    let colors = quantities
        .iter()
        .enumerate()
        .map(|(i, &q)| ColorVariant::new(format!("C{i}"), q))
        .collect();
    let request = AllocationRequest {
        roster,
        settings: AssignmentSettings { ratios, targets, ..Default::default() },
        catalog: vec![PhoneModel::new("M", colors)],
    };
    (request, snapshot)
}

proptest! {
    #[test]
    fn every_color_sums_to_its_quantity(
        agents in prop::collection::vec(figures(), 1..8),
        ratios in ratios(),
        quantities in prop::collection::vec(0u64..500, 1..4),
    ) {
        let (request, snapshot) = build(&agents, ratios, &quantities);
        let engine = AllocationEngine::new(EngineConfig::default()).unwrap();
        let allocation = engine.allocate_snapshot(&request, &snapshot).unwrap();

        let with_store = agents.iter().filter(|a| a.stores > 0).count();
        if with_store == 0 {
            prop_assert!(allocation.is_empty());
        } else {
            let model = &allocation.models["M"];
            for (i, &quantity) in quantities.iter().enumerate() {
                let color = &model.colors[&format!("C{i}")];
                prop_assert_eq!(color.assignments.values().sum::<u64>(), quantity);
                prop_assert_eq!(color.assignments.len(), with_store);
            }
            prop_assert_eq!(allocation.agents.len(), with_store);
            let office_total: u64 = allocation.offices.values().map(|g| g.total_quantity).sum();
            prop_assert_eq!(office_total, quantities.iter().sum::<u64>());
        }

        for (i, figures) in agents.iter().enumerate() {
            if figures.stores == 0 {
                let key = format!("agent-{i:02}");
                prop_assert!(!allocation.agents.contains_key(&key));
            }
        }
    }

    #[test]
    fn runs_are_reproducible(
        agents in prop::collection::vec(figures(), 1..8),
        ratios in ratios(),
        quantities in prop::collection::vec(0u64..200, 1..3),
    ) {
        let (request, snapshot) = build(&agents, ratios, &quantities);
        let cached = AllocationEngine::new(EngineConfig::default()).unwrap();
        let uncached = AllocationEngine::new(EngineConfig {
            cache: CacheConfig { enabled: false, ..Default::default() },
            parallel_models: false,
        })
        .unwrap();

        let first = serde_json::to_string(&cached.allocate_snapshot(&request, &snapshot).unwrap()).unwrap();
        let second = serde_json::to_string(&cached.allocate_snapshot(&request, &snapshot).unwrap()).unwrap();
        let third = serde_json::to_string(&uncached.allocate_snapshot(&request, &snapshot).unwrap()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &third);
    }
}
