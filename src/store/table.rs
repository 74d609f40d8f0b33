use time::OffsetDateTime;

/// A row kept in a [`Table`].
pub(crate) trait Record: Clone {
    fn id(&self) -> u64;
    /// Refresh the update timestamp after a merge.
    fn touch(&mut self, now: OffsetDateTime);
}

/// Ordered rows plus the id counter. Ids start at 1; deleting a row never
/// frees its id, only `clear` rewinds the counter.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: Vec<T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> Table<T> {
    pub fn insert_with(&mut self, build: impl FnOnce(u64, OffsetDateTime) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id, OffsetDateTime::now_utc());
        self.rows.push(row.clone());
        row
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.iter().find(|r| pred(r))
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Merge into a copy of the row, stamp it and swap it in.
    pub fn update(&mut self, id: u64, merge: impl FnOnce(&mut T)) -> Option<T> {
        let slot = self.rows.iter_mut().find(|r| r.id() == id)?;
        let mut merged = slot.clone();
        merge(&mut merged);
        merged.touch(OffsetDateTime::now_utc());
        *slot = merged.clone();
        Some(merged)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        match self.rows.iter().position(|r| r.id() == id) {
            Some(pos) => {
                self.rows.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove the row only if `check` accepts it; both happen under the caller's lock.
    pub fn remove_if<E>(
        &mut self,
        id: u64,
        check: impl FnOnce(&T) -> Result<(), E>,
    ) -> Result<bool, E> {
        let Some(pos) = self.rows.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        check(&self.rows[pos])?;
        self.rows.remove(pos);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.next_id = 1;
    }
}
