//! Small behaviors that widgets share without a common base type.
//! Queried through `ClientObject::as_*`.

use log::warn;

use crate::{ObjectRegistry, RemoteId};

/// Widget that renders an "over" state while the pointer hovers it
pub trait Hoverable {
    fn is_hovered(&self) -> bool;
    fn set_hovered(&mut self, hovered: bool);
}

/// Widget that belongs to a mutually exclusive selection group
pub trait RadioGroupMember {
    /// Group key; members with the same key deselect each other
    fn radio_group(&self) -> Option<String>;
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);
}

/// Widget that recomputes derived state when the active theme changes
pub trait ThemeAware {
    fn theme_changed(&mut self, theme_name: &str);
}

pub struct RadioGroup;

impl RadioGroup {
    /// Selects `id` and deselects every other member of its group.
    ///
    /// Returns the ids whose selection actually changed, the selected member
    /// first. Objects that are currently borrowed elsewhere are skipped.
    pub fn select(registry: &ObjectRegistry, id: &RemoteId) -> Vec<RemoteId> {
        let Some(entry) = registry.get(id) else {
            return Vec::new();
        };

        let group = {
            let Ok(mut object) = entry.object().try_borrow_mut() else {
                warn!("RadioGroup: {} is already borrowed", id);
                return Vec::new();
            };
            let Some(member) = object.as_radio_member() else {
                warn!("RadioGroup: {} is not a radio group member", id);
                return Vec::new();
            };
            let group = member.radio_group();
            if member.is_selected() {
                None
            } else {
                member.set_selected(true);
                Some(group)
            }
        };

        let Some(group) = group else {
            return Vec::new();
        };

        let mut changed = vec![id.clone()];
        let Some(group) = group else {
            return changed;
        };

        for sibling in registry.iter() {
            if sibling.id() == id {
                continue;
            }
            let Ok(mut object) = sibling.object().try_borrow_mut() else {
                continue;
            };
            let Some(member) = object.as_radio_member() else {
                continue;
            };
            if member.radio_group().as_deref() == Some(group.as_str()) && member.is_selected() {
                member.set_selected(false);
                changed.push(sibling.id().clone());
            }
        }

        changed
    }
}
