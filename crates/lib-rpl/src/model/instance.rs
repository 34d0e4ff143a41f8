use crate::model::{Dag, RouteEntry, SourceRouteEntry, Stats};

/// Everything this node tracks for one RPL instance: the DODAG it has
/// joined (if any) plus its downward routing state (RFC 6550 §3.1).
///
/// Only one DODAG per instance is kept, matching the Non-goal that rules
/// out running several DODAGs of the same instance side by side; a DIO for
/// a different `dodag_id` or a newer `version_number` replaces `dag`
/// wholesale rather than being tracked alongside it.
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: u8,
    pub dag: Option<Dag>,

    /// Storing-mode downward routes, keyed by nothing in particular; looked
    /// up linearly the way a constrained node's route table would be.
    pub routes: Vec<RouteEntry>,

    /// Non-storing-mode source routes, populated only at the root.
    pub source_routes: Vec<SourceRouteEntry>,

    /// DAOSequence this node last used for a self-originated DAO (§6.4),
    /// a lollipop counter advanced each time a fresh DAO goes out.
    pub dao_sequence: u8,

    /// PathSequence this node advertises for its own prefix (§7.2),
    /// advanced whenever the path it reports changes (new parent, repair).
    pub path_sequence: u8,

    /// DCOSequence this node last used for a self-originated DCO
    /// (draft-ietf-roll-efficient-npdao §4), a lollipop counter mirroring
    /// `dao_sequence`.
    pub dco_sequence: u8,

    /// Whether this node currently has a working route towards the root's
    /// DODAG, i.e. at least one DAO it sent upward has been acked with a
    /// success status (§3, §4.8).
    pub has_downward_route: bool,

    pub stats: Stats,
}

impl Instance {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            dag: None,
            routes: Vec::new(),
            source_routes: Vec::new(),
            dao_sequence: crate::LOLLIPOP_INIT,
            path_sequence: crate::LOLLIPOP_INIT,
            dco_sequence: crate::LOLLIPOP_INIT,
            has_downward_route: false,
            stats: Stats::default(),
        }
    }

    pub fn is_joined(&self) -> bool {
        self.dag.is_some()
    }

    /// Advances and returns the DAOSequence to stamp on the next
    /// self-originated DAO.
    pub fn next_dao_sequence(&mut self) -> u8 {
        self.dao_sequence = crate::lollipop::increment(self.dao_sequence);
        self.dao_sequence
    }

    /// Advances and returns the PathSequence to advertise for this node's
    /// own target, e.g. after a parent switch changes the path it reports.
    pub fn next_path_sequence(&mut self) -> u8 {
        self.path_sequence = crate::lollipop::increment(self.path_sequence);
        self.path_sequence
    }

    /// Advances and returns the DCOSequence to stamp on the next
    /// self-originated DCO.
    pub fn next_dco_sequence(&mut self) -> u8 {
        self.dco_sequence = crate::lollipop::increment(self.dco_sequence);
        self.dco_sequence
    }
}
