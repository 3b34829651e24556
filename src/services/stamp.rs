use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};
use moka::future::Cache;

use crate::database::models::{
    PrefectureStamp, PrefectureDetailResponse, PrefectureStampStatus, RankingEntry,
    RankingResponse, StampCollectionResponse, StampCollectionSummary,
};
use crate::database::repositories::{FarmRepository, ReviewRepository, StampRepository};

const TOTAL_PREFECTURES: f64 = 47.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn completion_rate(visited: i64) -> f64 {
    if visited > 0 {
        round1(visited as f64 / TOTAL_PREFECTURES * 100.0)
    } else {
        0.0
    }
}

/// Stamp rally logic: the per-guest prefecture grid, visit details, the
/// ranking, and the review-driven sync that awards stamps.
#[derive(Clone)]
pub struct StampService {
    stamp_repository: StampRepository,
    review_repository: ReviewRepository,
    farm_repository: FarmRepository,
    // The 47-row master table is read on every stamp request; cache it.
    prefecture_cache: Cache<&'static str, Vec<PrefectureStamp>>,
}

impl StampService {
    pub fn new(
        stamp_repository: StampRepository,
        review_repository: ReviewRepository,
        farm_repository: FarmRepository,
    ) -> Self {
        Self {
            stamp_repository,
            review_repository,
            farm_repository,
            prefecture_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(3600))
                .build(),
        }
    }

    pub async fn get_all_prefectures(&self) -> Result<Vec<PrefectureStamp>> {
        let repository = self.stamp_repository.clone();

        self.prefecture_cache
            .try_get_with("prefectures", async move {
                repository.get_all_prefectures().await
            })
            .await
            .map_err(|e| anyhow!("Failed to load prefecture master: {}", e))
    }

    /// All 47 prefectures with the guest's visit status, plus totals.
    pub async fn get_user_collection(&self, guest_id: i64) -> Result<StampCollectionResponse> {
        let all_prefectures = self.get_all_prefectures().await?;
        let collections = self
            .stamp_repository
            .get_collections_by_guest(guest_id)
            .await?;

        let by_code: HashMap<&str, _> = collections
            .iter()
            .map(|c| (c.prefecture_code.as_str(), c))
            .collect();

        let mut stamps = Vec::with_capacity(all_prefectures.len());
        let mut total_visits = 0;
        let mut total_farms = 0;

        for prefecture in &all_prefectures {
            match by_code.get(prefecture.prefecture_code.as_str()) {
                Some(collection) => {
                    stamps.push(PrefectureStampStatus {
                        prefecture_code: prefecture.prefecture_code.clone(),
                        name: prefecture.name.clone(),
                        image_url: prefecture.image_url.clone(),
                        region: prefecture.region.clone(),
                        is_visited: true,
                        visit_count: collection.visit_count,
                        first_visit_date: Some(collection.first_visit_date),
                        last_visit_date: Some(collection.last_visit_date),
                        unique_farms_count: collection.unique_farms_count,
                    });
                    total_visits += collection.visit_count;
                    total_farms += collection.unique_farms_count;
                }
                None => {
                    stamps.push(PrefectureStampStatus {
                        prefecture_code: prefecture.prefecture_code.clone(),
                        name: prefecture.name.clone(),
                        image_url: prefecture.image_url.clone(),
                        region: prefecture.region.clone(),
                        is_visited: false,
                        visit_count: 0,
                        first_visit_date: None,
                        last_visit_date: None,
                        unique_farms_count: 0,
                    });
                }
            }
        }

        let total_prefectures = collections.len() as i64;

        Ok(StampCollectionResponse {
            summary: StampCollectionSummary {
                total_prefectures,
                total_visits,
                total_farms,
                completion_rate: completion_rate(total_prefectures),
            },
            stamps,
        })
    }

    /// Visit detail for one prefecture; `None` when the guest has never
    /// stamped it.
    pub async fn get_prefecture_detail(
        &self,
        guest_id: i64,
        prefecture_code: &str,
    ) -> Result<Option<PrefectureDetailResponse>> {
        let Some(collection) = self
            .stamp_repository
            .get_collection(guest_id, prefecture_code)
            .await?
        else {
            return Ok(None);
        };

        let Some(prefecture) = self
            .stamp_repository
            .get_prefecture_by_code(prefecture_code)
            .await?
        else {
            return Ok(None);
        };

        let visited_farms = self
            .stamp_repository
            .get_visited_farms(guest_id, prefecture_code)
            .await?;

        Ok(Some(PrefectureDetailResponse {
            prefecture_code: prefecture_code.to_string(),
            name: prefecture.name,
            visit_count: collection.visit_count,
            first_visit_date: collection.first_visit_date,
            last_visit_date: collection.last_visit_date,
            unique_farms_count: collection.unique_farms_count,
            visited_farms,
        }))
    }

    pub async fn get_ranking(
        &self,
        limit: i64,
        current_user_id: Option<i64>,
    ) -> Result<RankingResponse> {
        let rows = self.stamp_repository.get_ranking_rows(limit).await?;

        let rankings: Vec<RankingEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| RankingEntry {
                rank: index as i64 + 1,
                guest_id: row.guest_id,
                guest_name: row.guest_name,
                avatar_url: row.avatar_url,
                total_prefectures: row.total_prefectures,
                completion_rate: completion_rate(row.total_prefectures),
            })
            .collect();

        let my_ranking = current_user_id
            .and_then(|id| rankings.iter().find(|entry| entry.guest_id == id).cloned());

        let total_users = self.stamp_repository.count_collectors().await?;

        Ok(RankingResponse {
            rankings,
            my_ranking,
            total_users,
        })
    }

    /// Awards the stamp for a freshly posted review. Idempotent: a review
    /// that was already stamped is left untouched.
    pub async fn sync_from_review(&self, review_id: i64) -> Result<()> {
        let Some(review) = self.review_repository.get_review_by_id(review_id).await? else {
            return Ok(());
        };

        let Some(farm) = self.farm_repository.get_farm_by_id(review.farm_id).await? else {
            return Ok(());
        };

        let Some(prefecture_code) = self
            .stamp_repository
            .get_prefecture_code_by_name(&farm.prefecture)
            .await?
        else {
            // Farm prefecture not in the master table; nothing to stamp.
            return Ok(());
        };

        if self
            .stamp_repository
            .get_detail_by_review(review_id)
            .await?
            .is_none()
        {
            self.stamp_repository
                .insert_detail(
                    review.guest_id,
                    &prefecture_code,
                    farm.id,
                    review_id,
                    review.experience_date,
                    &farm.experience_type.to_string(),
                )
                .await?;
        }

        match self
            .stamp_repository
            .get_collection(review.guest_id, &prefecture_code)
            .await?
        {
            Some(collection) => {
                let unique_farms = self
                    .stamp_repository
                    .count_unique_farms(review.guest_id, &prefecture_code)
                    .await?
                    .max(1);

                self.stamp_repository
                    .update_collection_visit(
                        collection.id,
                        collection.visit_count + 1,
                        collection.first_visit_date.min(review.experience_date),
                        collection.last_visit_date.max(review.experience_date),
                        unique_farms,
                    )
                    .await?;
            }
            None => {
                self.stamp_repository
                    .insert_collection(review.guest_id, &prefecture_code, review.experience_date)
                    .await?;
            }
        }

        Ok(())
    }
}
