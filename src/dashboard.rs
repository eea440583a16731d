use crate::{
    api::AlumnosApi,
    data::{Statistics, Student, StudentFilters},
    error::AlumnosResult,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

///what a child view reports back after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentEvent {
    Created(Student),
    Updated(Student),
    Deleted(i32),
}

///owner of the loaded students, the statistics snapshot and the filters they were loaded with
#[derive(Debug, Default)]
pub struct Dashboard {
    filters: StudentFilters,
    loaded_for: Option<StudentFilters>,
    students: Vec<Student>,
    statistics: Option<Statistics>,
}

impl Dashboard {
    pub const fn filters(&self) -> &StudentFilters {
        &self.filters
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub const fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn student(&self, id: i32) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn set_filters(&mut self, filters: StudentFilters) {
        if filters != self.filters {
            debug!(?filters, "Filters changed");
            self.filters = filters;
        }
    }

    ///true until a reload has succeeded for the current filters
    pub fn is_stale(&self) -> bool {
        self.loaded_for.as_ref() != Some(&self.filters)
    }

    ///takes a finished fetch, unless the filters moved on while it was in flight
    pub fn commit(
        &mut self,
        fetched_for: &StudentFilters,
        students: Vec<Student>,
        statistics: Statistics,
    ) -> bool {
        if fetched_for != &self.filters {
            return false;
        }

        self.students = students;
        self.statistics = Some(statistics);
        self.loaded_for = Some(fetched_for.clone());
        true
    }

    pub fn apply(&mut self, event: StudentEvent) {
        match event {
            StudentEvent::Created(student) => self.students.insert(0, student),
            StudentEvent::Updated(student) => {
                if let Some(existing) = self.students.iter_mut().find(|s| s.id == student.id) {
                    *existing = student;
                }
            }
            StudentEvent::Deleted(id) => self.students.retain(|s| s.id != id),
        }
    }

    pub fn search(&self, term: &str) -> Vec<&Student> {
        let term = term.trim().to_lowercase();
        self.students
            .iter()
            .filter(|s| s.matches_search(&term))
            .collect()
    }
}

///list and statistics together, or nothing
pub async fn fetch(
    api: &AlumnosApi,
    filters: &StudentFilters,
) -> AlumnosResult<(Vec<Student>, Statistics)> {
    tokio::try_join!(api.list(filters), api.statistics())
}

///one browser tab's dashboard
///
///the lock is only ever held for in-memory work, never across a backend call, so a hung
///backend stalls the request waiting on it and nothing else
#[derive(Debug, Clone, Default)]
pub struct SharedDashboard(Arc<Mutex<Dashboard>>);

impl From<Dashboard> for SharedDashboard {
    fn from(dashboard: Dashboard) -> Self {
        Self(Arc::new(Mutex::new(dashboard)))
    }
}

impl SharedDashboard {
    pub async fn lock(&self) -> MutexGuard<'_, Dashboard> {
        self.0.lock().await
    }

    ///fetches for the filters current at the start, only replacing state if both calls succeed
    pub async fn reload(&self, api: &AlumnosApi) -> AlumnosResult<()> {
        let filters = self.lock().await.filters().clone();
        let (students, statistics) = fetch(api, &filters).await?;

        let count = students.len();
        let committed = self.lock().await.commit(&filters, students, statistics);
        if committed {
            debug!(count, "Reloaded students");
        } else {
            debug!(?filters, "Filters changed during reload, discarding");
        }
        Ok(())
    }

    ///records the requested filters and reloads if nothing is loaded for them yet
    pub async fn refresh(&self, filters: StudentFilters, api: &AlumnosApi) -> AlumnosResult<()> {
        let stale = {
            let mut dashboard = self.lock().await;
            dashboard.set_filters(filters);
            dashboard.is_stale()
        };

        if stale { self.reload(api).await } else { Ok(()) }
    }

    ///optimistic splice, then a full reload so the statistics catch up
    pub async fn reconcile(&self, event: StudentEvent, api: &AlumnosApi) -> AlumnosResult<()> {
        self.lock().await.apply(event);
        self.reload(api).await
    }
}
