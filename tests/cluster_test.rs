extern crate rand;
extern crate tfim_sse;
use rand::rngs::mock::StepRng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tfim_sse::chain::ChainParams;
use tfim_sse::sse::qmc_types::Op;
use tfim_sse::sse::*;

fn two_site(beta: f64) -> ChainParams {
    ChainParams {
        length: 2,
        beta,
        coupling: 1.0,
        field: 1.0,
    }
}

#[test]
fn bond_cluster_flips_together() {
    let ops = OpString::from_ops(vec![None, Some(Op::DiagBond(0)), None, None]);
    // A zero stream flips every cluster.
    let mut g =
        TfimChain::new_with_ops(two_site(1.0), vec![true, true], ops, StepRng::new(0, 0)).unwrap();
    g.make_vertex_list();
    assert!(g.get_vertex_list_ref().is_symmetric());
    g.cluster_update();
    assert_eq!(g.clone_state(), vec![false, false]);
    assert_eq!(g.get_manager_ref().get_pth(1), Some(Op::DiagBond(0)));
    let vl = g.get_vertex_list_ref();
    for leg in 4..8 {
        assert_eq!(vl.get(leg), LegState::Visited { flip: true });
    }
    assert!(g.verify());
}

#[test]
fn bond_cluster_stays_without_flip() {
    let ops = OpString::from_ops(vec![None, Some(Op::DiagBond(0)), None, None]);
    // Draws of ~1.0 never flip.
    let mut g = TfimChain::new_with_ops(
        two_site(1.0),
        vec![true, true],
        ops,
        StepRng::new(u64::MAX, 0),
    )
    .unwrap();
    g.cluster_update();
    assert_eq!(g.clone_state(), vec![true, true]);
    let vl = g.get_vertex_list_ref();
    for leg in 4..8 {
        assert_eq!(vl.get(leg), LegState::Visited { flip: false });
    }
}

#[test]
fn free_spins_flip_with_coin() {
    let ops = OpString::from_ops(vec![Some(Op::DiagSite(0)), None]);
    let mut g =
        TfimChain::new_with_ops(two_site(1.0), vec![true, true], ops, StepRng::new(0, 0)).unwrap();
    g.cluster_update();
    // Site 1 has no ops and is flipped by its own coin.
    assert_eq!(g.clone_state(), vec![false, false]);
}

#[test]
fn vertex_list_symmetric_after_updates() {
    let params = ChainParams {
        length: 6,
        beta: 2.0,
        coupling: 1.0,
        field: 0.7,
    };
    let rng = SmallRng::seed_from_u64(1234);
    let mut g = TfimChain::new_with_rng(params, rng).unwrap();
    for _ in 0..300 {
        g.diagonal_update();
        g.make_vertex_list();
        let vl = g.get_vertex_list_ref();
        assert!(vl.is_symmetric());
        let ops = g.get_manager_ref();
        for p in 0..ops.get_cutoff() {
            let used = match ops.get_pth(p) {
                None => 0,
                Some(Op::DiagBond(_)) => 4,
                Some(_) => 2,
            };
            let live = (0..4).filter(|i| vl.is_live(4 * p + i)).count();
            assert_eq!(live, used);
        }
        g.cluster_update();
        assert!(g.verify());
        g.adjust_cutoff();
    }
}
