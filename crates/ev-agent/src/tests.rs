//! Unit tests for ev-agent.

#[cfg(test)]
mod phase {
    use crate::AgentPhase::{self, *};

    #[test]
    fn lifecycle_edges() {
        assert!(Unplaced.can_become(WaitingAtNode));
        assert!(WaitingAtNode.can_become(InTransit));
        assert!(InTransit.can_become(WaitingAtNode));
        assert!(InTransit.can_become(Evacuated));
        assert!(WaitingAtNode.can_become(Dead));
        assert!(InTransit.can_become(Dead));
    }

    #[test]
    fn terminal_phases_never_leave() {
        for t in [Evacuated, Dead] {
            assert!(t.is_terminal());
            for next in [Unplaced, WaitingAtNode, InTransit, Evacuated, Dead] {
                assert!(!t.can_become(next), "{t} -> {next} should be illegal");
            }
        }
    }

    #[test]
    fn unplaced_cannot_skip_placement() {
        assert!(!Unplaced.can_become(InTransit));
        assert!(!Unplaced.can_become(Dead));
        assert!(!AgentPhase::default().is_active());
    }
}

#[cfg(test)]
mod store {
    use ev_core::{AgentId, AgentKind, NodeId};
    use crate::{AgentError, AgentPhase, AgentStore};

    #[test]
    fn spawn_assigns_dense_ids() {
        let mut store = AgentStore::new();
        let a = store.spawn("ward-0", AgentKind::Resident);
        let b = store.spawn("ward-1", AgentKind::Visitor);
        assert_eq!((a, b), (AgentId(0), AgentId(1)));
        assert_eq!(store.count, 2);
        assert_eq!(store.name[1], "ward-1");
        assert_eq!(store.kind[1], AgentKind::Visitor);
        assert_eq!(store.phase(a), AgentPhase::Unplaced);
        assert_eq!(store.orig_node[a.index()], NodeId::INVALID);
        assert_eq!(store.destination(a), None);
    }

    #[test]
    fn place_records_origin() {
        let mut store = AgentStore::new();
        let a = store.spawn("a", AgentKind::Resident);
        store.place(a, NodeId(7)).unwrap();
        assert_eq!(store.orig_node[a.index()], NodeId(7));
        assert!(store.is_active(a));
    }

    #[test]
    fn illegal_transition_leaves_phase() {
        let mut store = AgentStore::new();
        let a = store.spawn("a", AgentKind::Resident);
        store.place(a, NodeId(0)).unwrap();
        store.transition(a, AgentPhase::Evacuated).unwrap();
        let err = store.transition(a, AgentPhase::InTransit).unwrap_err();
        assert!(matches!(err, AgentError::IllegalTransition { from: AgentPhase::Evacuated, .. }));
        assert!(store.is_evacuated(a));
    }

    #[test]
    fn unknown_agent() {
        let mut store = AgentStore::new();
        assert!(matches!(
            store.transition(AgentId(3), AgentPhase::Dead),
            Err(AgentError::NotFound(AgentId(3)))
        ));
        assert!(store.set_destination(AgentId(3), None).is_err());
    }

    #[test]
    fn counts_by_phase() {
        let mut store = AgentStore::with_capacity(4);
        let ids: Vec<_> = (0..4).map(|i| store.spawn(format!("p-{i}"), AgentKind::Resident)).collect();
        for &a in &ids[..3] {
            store.place(a, NodeId(0)).unwrap();
        }
        store.transition(ids[1], AgentPhase::InTransit).unwrap();
        store.transition(ids[2], AgentPhase::Dead).unwrap();

        let c = store.counts();
        assert_eq!(c.unplaced, 1);
        assert_eq!(c.waiting, 1);
        assert_eq!(c.in_transit, 1);
        assert_eq!(c.dead, 1);
        assert_eq!(c.total(), 4);
        assert_eq!(c.finished(), 1);
        assert_eq!(store.active_ids().collect::<Vec<_>>(), vec![ids[0], ids[1]]);
    }
}
