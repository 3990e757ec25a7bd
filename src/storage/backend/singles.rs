//! Single types: hero section and about section
//!
//! Each table holds at most one row; PUT creates it on first write.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{AboutSection, AboutSectionInput, HeroSection, HeroSectionInput};

use migration::entities::{about_section, hero_section};

impl SeaOrmStorage {
    pub async fn get_hero_section(&self) -> Result<Option<HeroSection>> {
        let model = hero_section::Entity::find()
            .order_by_asc(hero_section::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(HeroSection::from))
    }

    pub async fn put_hero_section(&self, input: HeroSectionInput) -> Result<HeroSection> {
        let now = Utc::now();
        let existing = hero_section::Entity::find()
            .order_by_asc(hero_section::Column::Id)
            .one(&self.db)
            .await?;
        let is_new = existing.is_none();

        let mut active = match existing {
            Some(model) => model.into_active_model(),
            None => hero_section::ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        active.title = Set(input.title);
        active.subtitle = Set(input.subtitle);
        active.description = Set(input.description);
        active.cta_label = Set(input.cta_label);
        active.cta_url = Set(input.cta_url);
        active.avatar_url = Set(input.avatar_url);
        active.updated_at = Set(now);

        let model = if is_new {
            active.insert(&self.db).await?
        } else {
            active.update(&self.db).await?
        };
        info!("Hero section saved");
        Ok(HeroSection::from(model))
    }

    pub async fn get_about_section(&self) -> Result<Option<AboutSection>> {
        let model = about_section::Entity::find()
            .order_by_asc(about_section::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(AboutSection::from))
    }

    pub async fn put_about_section(&self, input: AboutSectionInput) -> Result<AboutSection> {
        let now = Utc::now();
        let existing = about_section::Entity::find()
            .order_by_asc(about_section::Column::Id)
            .one(&self.db)
            .await?;
        let is_new = existing.is_none();

        let mut active = match existing {
            Some(model) => model.into_active_model(),
            None => about_section::ActiveModel {
                created_at: Set(now),
                ..Default::default()
            },
        };
        active.heading = Set(input.heading);
        active.body = Set(input.body);
        active.resume_url = Set(input.resume_url);
        active.location = Set(input.location);
        active.updated_at = Set(now);

        let model = if is_new {
            active.insert(&self.db).await?
        } else {
            active.update(&self.db).await?
        };
        info!("About section saved");
        Ok(AboutSection::from(model))
    }
}
