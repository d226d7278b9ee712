//! Paginated report fetching, batched or one calendar day at a time.

use std::time::Duration;

use crate::api::ReportsApi;
use crate::dates::{DateRange, DATE_FORMAT};
use crate::error::Result;
use crate::payload::{PayloadBuilder, ReportPayload};
use crate::report::ReportBatch;

/// Knobs shared by every paginated fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Log progress before every page request
    pub verbose: bool,
    /// Pause before every page request, the first one included
    pub delay: Duration,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Whether a date range is fetched as a whole or one day at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    #[default]
    Batched,
    DayByDay,
}

/// Fetch every page of `payload`, following `nextPageToken` until exhausted.
///
/// Each request is derived from `payload`; the caller's value still points
/// at the first page afterwards.
pub async fn fetch_all_pages<A>(
    api: &A,
    payload: &ReportPayload,
    options: &FetchOptions,
) -> Result<ReportBatch>
where
    A: ReportsApi + ?Sized,
{
    let mut batch = ReportBatch::default();
    let mut request = payload.clone();

    loop {
        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
        if options.verbose {
            tracing::info!(
                "Fetching rows starting at position: {}",
                request.page_token()
            );
        }

        let response = api.batch_get(&request).await?;
        let next_token = response.next_page_token().map(str::to_string);
        batch.extend(response.reports);

        match next_token {
            Some(token) => request = request.with_page_token(token),
            None => break,
        }
    }

    tracing::debug!(pages = batch.len(), rows = batch.row_count(), "Fetch complete");
    Ok(batch)
}

/// Fetches report data for one date range.
#[derive(Debug, Clone)]
pub struct ReportFetcher {
    date_range: DateRange,
}

impl ReportFetcher {
    pub fn new(date_range: DateRange) -> Self {
        Self { date_range }
    }

    /// Build from two `YYYY-MM-DD` strings.
    pub fn from_dates(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(DateRange::parse(start, end)?))
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    /// Number of per-day fetches a [`FetchMode::DayByDay`] run performs.
    pub fn days(&self) -> usize {
        self.date_range.num_days()
    }

    /// A payload builder over this fetcher's date range.
    pub fn payload_builder(&self) -> PayloadBuilder {
        PayloadBuilder::new(self.date_range)
    }

    /// Fetch all pages of `payload`.
    ///
    /// [`FetchMode::Batched`] returns one batch over the payload's own date
    /// range. [`FetchMode::DayByDay`] returns one batch per day of this
    /// fetcher's range, newest day first.
    pub async fn get_data<A>(
        &self,
        api: &A,
        payload: &ReportPayload,
        mode: FetchMode,
        options: &FetchOptions,
    ) -> Result<Vec<ReportBatch>>
    where
        A: ReportsApi + ?Sized,
    {
        match mode {
            FetchMode::Batched => {
                if options.verbose {
                    tracing::info!("fetching data between {}", self.date_range);
                }
                Ok(vec![fetch_all_pages(api, payload, options).await?])
            }
            FetchMode::DayByDay => {
                let days = self.date_range.days();
                let mut data = Vec::with_capacity(days.len());
                for day in days {
                    if options.verbose {
                        let day = day.format(DATE_FORMAT);
                        tracing::info!("fetching data between {} and {}", day, day);
                    }
                    let daily = payload.with_date_range(DateRange::single_day(day));
                    data.push(fetch_all_pages(api, &daily, options).await?);
                }
                Ok(data)
            }
        }
    }
}
