//! Records identified by a backend-assigned key.

/// A record the backend serves under a stable integer key.
///
/// Lists are re-fetched after every mutation, so equality of ids (not of
/// whole records) is what ties a row on screen to the record being edited.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// First record in `records` keyed `id`.
pub fn find_by_id<'a, E: Entity>(records: &'a [E], id: &E::Id) -> Option<&'a E> {
    records.iter().find(|r| r.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientId;

    struct Row(ClientId, &'static str);

    impl Entity for Row {
        type Id = ClientId;

        fn id(&self) -> &ClientId {
            &self.0
        }
    }

    #[test]
    fn finds_by_key() {
        let rows = [Row(ClientId::new(1), "a"), Row(ClientId::new(2), "b")];
        assert_eq!(find_by_id(&rows, &ClientId::new(2)).map(|r| r.1), Some("b"));
        assert!(find_by_id(&rows, &ClientId::new(3)).is_none());
    }
}
