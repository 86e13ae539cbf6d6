use super::super::domain::{Photo, PhotoSlot};

/// Handle for one in-flight validation of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoTicket {
    pub slot: PhotoSlot,
    pub request_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SlotState {
    photo: Photo,
    latest_request: u64,
}

/// The two photo slots. Records are always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoStore {
    slots: [SlotState; 2],
}

impl PhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: PhotoSlot) -> &Photo {
        &self.slots[slot.index()].photo
    }

    /// Start a validation for `slot`; anything issued earlier becomes stale.
    pub fn begin(&mut self, slot: PhotoSlot) -> PhotoTicket {
        let state = &mut self.slots[slot.index()];
        state.latest_request += 1;
        PhotoTicket {
            slot,
            request_id: state.latest_request,
        }
    }

    pub fn latest(&self, slot: PhotoSlot) -> PhotoTicket {
        PhotoTicket {
            slot,
            request_id: self.slots[slot.index()].latest_request,
        }
    }

    /// Whether `ticket` is still the newest request for its slot.
    pub fn is_current(&self, ticket: PhotoTicket) -> bool {
        self.slots[ticket.slot.index()].latest_request == ticket.request_id
    }

    /// Store a validation result unless a newer request superseded it.
    pub fn resolve(&mut self, ticket: PhotoTicket, photo: Photo) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.slots[ticket.slot.index()].photo = photo;
        true
    }

    /// Empty the slot and drop any validation still running for it.
    pub fn reset(&mut self, slot: PhotoSlot) {
        let state = &mut self.slots[slot.index()];
        state.latest_request += 1;
        state.photo = Photo::empty();
    }

    /// Flag a slot that has no file; validity is left untouched.
    pub fn require_file(&mut self, slot: PhotoSlot, message: &str) -> bool {
        let photo = &mut self.slots[slot.index()].photo;
        if photo.file.is_some() {
            return false;
        }
        photo.error = Some(message.to_string());
        true
    }

    pub fn all_valid(&self) -> bool {
        self.slots.iter().all(|state| state.photo.is_valid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PhotoSlot, &Photo)> {
        PhotoSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.get(slot)))
    }
}
