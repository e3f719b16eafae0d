use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use log::info;

use crate::{object::error::RegistryError, ObjectRef, RemoteId, TypeHandler};

/// Identity of a shared object cell, independent of the pointee's type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ObjectKey(usize);

impl ObjectKey {
    fn of<T: ?Sized>(object: &Rc<RefCell<T>>) -> Self {
        Self(Rc::as_ptr(object) as *const () as usize)
    }
}

pub struct RegistryEntry {
    id: RemoteId,
    object: ObjectRef,
    handler: Rc<TypeHandler>,
    sequence: u64,
}

impl RegistryEntry {
    pub fn id(&self) -> &RemoteId {
        &self.id
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn handler(&self) -> &Rc<TypeHandler> {
        &self.handler
    }

    /// Position of this entry in registration order
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Bijection between remote ids and live client objects
pub struct ObjectRegistry {
    entries: HashMap<RemoteId, RegistryEntry>,
    ids_by_object: HashMap<ObjectKey, RemoteId>,
    registration_order: BTreeMap<u64, RemoteId>,
    next_sequence: u64,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            ids_by_object: HashMap::new(),
            registration_order: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    pub fn register(
        &mut self,
        id: RemoteId,
        object: ObjectRef,
        handler: Rc<TypeHandler>,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&id) {
            return Err(RegistryError::IdAlreadyRegistered { id: id.to_string() });
        }
        let key = ObjectKey::of(&object);
        if let Some(existing_id) = self.ids_by_object.get(&key) {
            return Err(RegistryError::ObjectAlreadyRegistered {
                id: id.to_string(),
                existing_id: existing_id.to_string(),
            });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        info!(
            "ObjectRegistry: Registering {} as {}",
            id,
            handler.type_name()
        );

        self.ids_by_object.insert(key, id.clone());
        self.registration_order.insert(sequence, id.clone());
        self.entries.insert(
            id.clone(),
            RegistryEntry {
                id,
                object,
                handler,
                sequence,
            },
        );

        Ok(())
    }

    pub fn unregister(&mut self, id: &RemoteId) -> Result<RegistryEntry, RegistryError> {
        let Some(entry) = self.entries.remove(id) else {
            return Err(RegistryError::IdNotRegistered { id: id.to_string() });
        };

        self.ids_by_object.remove(&ObjectKey::of(&entry.object));
        self.registration_order.remove(&entry.sequence);

        info!("ObjectRegistry: Unregistered {}", id);

        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn object(&self, id: &str) -> Option<ObjectRef> {
        self.entries.get(id).map(|entry| entry.object.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Reverse lookup, by identity of the shared cell
    pub fn find_id<T: ?Sized>(&self, object: &Rc<RefCell<T>>) -> Option<&RemoteId> {
        self.ids_by_object.get(&ObjectKey::of(object))
    }

    pub fn sequence_of(&self, id: &str) -> Option<u64> {
        self.entries.get(id).map(|entry| entry.sequence)
    }

    /// Live entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.registration_order
            .values()
            .filter_map(|id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
