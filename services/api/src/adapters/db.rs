//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PresentationStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every mutating method runs inside one transaction. Dropping the transaction on
//! an early `?` return rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slidecraft_core::domain::{
    Framework, FrameworkSlide, Idea, NewFramework, NewPresentation, Presentation,
    PresentationSettings, Slide, SlideColors, SlideDraft, SlideLayout, SlideOrder, SlideType,
    SlideUpdate, TextAlign, VoiceProfile,
};
use slidecraft_core::ports::{PortError, PortResult, PresentationStore};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PresentationStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> PortResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(unexpected)
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(what: &str, id: Uuid) -> impl FnOnce(sqlx::Error) -> PortError + '_ {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} {} not found", what, id)),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const PRESENTATION_COLUMNS: &str = "id, title, description, prompt, primary_color, secondary_color, font_family, voice_profile_id, framework_id, created_at, updated_at";

#[derive(FromRow)]
struct PresentationRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    prompt: String,
    primary_color: String,
    secondary_color: String,
    font_family: String,
    voice_profile_id: Option<Uuid>,
    framework_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl PresentationRecord {
    fn to_domain(self) -> Presentation {
        Presentation {
            id: self.id,
            title: self.title,
            description: self.description,
            prompt: self.prompt,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            font_family: self.font_family,
            voice_profile_id: self.voice_profile_id,
            framework_id: self.framework_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const SLIDE_COLUMNS: &str = "id, presentation_id, slide_order, title, content, narration, annotations, slide_type, layout, image_url, background_color, text_color, heading_color, text_align, show_title, show_content";

#[derive(FromRow)]
struct SlideRecord {
    id: Uuid,
    presentation_id: Uuid,
    slide_order: i32,
    title: String,
    content: String,
    narration: Option<String>,
    annotations: Option<String>,
    slide_type: String,
    layout: String,
    image_url: Option<String>,
    background_color: Option<String>,
    text_color: Option<String>,
    heading_color: Option<String>,
    text_align: String,
    show_title: bool,
    show_content: bool,
}
impl SlideRecord {
    fn to_domain(self) -> PortResult<Slide> {
        Ok(Slide {
            id: self.id,
            presentation_id: self.presentation_id,
            order: self.slide_order,
            title: self.title,
            content: self.content,
            narration: self.narration,
            annotations: self.annotations,
            slide_type: parse_slide_type(&self.slide_type)?,
            layout: parse_layout(&self.layout)?,
            image_url: self.image_url,
            background_color: self.background_color,
            text_color: self.text_color,
            heading_color: self.heading_color,
            text_align: TextAlign::parse(&self.text_align).ok_or_else(|| {
                PortError::Unexpected(format!("Stored text alignment '{}' is invalid", self.text_align))
            })?,
            show_title: self.show_title,
            show_content: self.show_content,
        })
    }
}

fn parse_slide_type(value: &str) -> PortResult<SlideType> {
    SlideType::parse(value)
        .ok_or_else(|| PortError::Unexpected(format!("Stored slide type '{}' is invalid", value)))
}

fn parse_layout(value: &str) -> PortResult<SlideLayout> {
    SlideLayout::parse(value)
        .ok_or_else(|| PortError::Unexpected(format!("Stored layout '{}' is invalid", value)))
}

#[derive(FromRow)]
struct FrameworkRecord {
    id: Uuid,
    name: String,
    description: Option<String>,
    is_default: bool,
}

#[derive(FromRow)]
struct FrameworkSlideRecord {
    id: Uuid,
    framework_id: Uuid,
    title: String,
    instructions: String,
    slide_type: String,
    layout: String,
    slide_order: i32,
}
impl FrameworkSlideRecord {
    fn to_domain(self) -> PortResult<FrameworkSlide> {
        Ok(FrameworkSlide {
            id: self.id,
            title: self.title,
            instructions: self.instructions,
            slide_type: parse_slide_type(&self.slide_type)?,
            layout: parse_layout(&self.layout)?,
            order: self.slide_order,
        })
    }
}

const VOICE_COLUMNS: &str = "id, name, is_default, tone, audience, objective, brand_voice, content_style, restrictions, other";

#[derive(FromRow)]
struct VoiceProfileRecord {
    id: Uuid,
    name: String,
    is_default: bool,
    tone: Vec<String>,
    audience: Vec<String>,
    objective: Vec<String>,
    brand_voice: Vec<String>,
    content_style: Vec<String>,
    restrictions: Vec<String>,
    other: Vec<String>,
}
impl VoiceProfileRecord {
    fn to_domain(self) -> VoiceProfile {
        VoiceProfile {
            id: self.id,
            name: self.name,
            is_default: self.is_default,
            tone: self.tone,
            audience: self.audience,
            objective: self.objective,
            brand_voice: self.brand_voice,
            content_style: self.content_style,
            restrictions: self.restrictions,
            other: self.other,
        }
    }
}

#[derive(FromRow)]
struct IdeaRecord {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
}
impl IdeaRecord {
    fn to_domain(self) -> Idea {
        Idea {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// Slide Writes Shared Between Operations
//=========================================================================================

async fn insert_slide(
    tx: &mut Transaction<'static, Postgres>,
    presentation_id: Uuid,
    order: i32,
    draft: SlideDraft,
) -> PortResult<Slide> {
    let sql = format!(
        "INSERT INTO slides ({SLIDE_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {SLIDE_COLUMNS}"
    );
    sqlx::query_as::<_, SlideRecord>(&sql)
        .bind(Uuid::new_v4())
        .bind(presentation_id)
        .bind(order)
        .bind(draft.title)
        .bind(draft.content)
        .bind(draft.narration)
        .bind(draft.annotations)
        .bind(draft.slide_type.as_str())
        .bind(draft.layout.as_str())
        .bind(draft.image_url)
        .bind(draft.background_color)
        .bind(draft.text_color)
        .bind(draft.heading_color)
        .bind(draft.text_align.as_str())
        .bind(draft.show_title)
        .bind(draft.show_content)
        .fetch_one(&mut **tx)
        .await
        .map_err(unexpected)?
        .to_domain()
}

async fn load_framework_slides(
    pool: &PgPool,
    framework_ids: &[Uuid],
) -> PortResult<HashMap<Uuid, Vec<FrameworkSlide>>> {
    let records = sqlx::query_as::<_, FrameworkSlideRecord>(
        "SELECT id, framework_id, title, instructions, slide_type, layout, slide_order \
         FROM framework_slides WHERE framework_id = ANY($1) ORDER BY slide_order ASC",
    )
    .bind(framework_ids)
    .fetch_all(pool)
    .await
    .map_err(unexpected)?;

    let mut grouped: HashMap<Uuid, Vec<FrameworkSlide>> = HashMap::new();
    for record in records {
        let framework_id = record.framework_id;
        grouped
            .entry(framework_id)
            .or_default()
            .push(record.to_domain()?);
    }
    Ok(grouped)
}

//=========================================================================================
// `PresentationStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PresentationStore for DbAdapter {
    async fn create_presentation(
        &self,
        presentation: NewPresentation,
        slides: Vec<SlideDraft>,
    ) -> PortResult<Presentation> {
        let mut tx = self.begin().await?;

        let sql = format!(
            "INSERT INTO presentations (id, title, description, prompt, primary_color, secondary_color, font_family, voice_profile_id, framework_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {PRESENTATION_COLUMNS}"
        );
        let record = sqlx::query_as::<_, PresentationRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(presentation.title)
            .bind(presentation.description)
            .bind(presentation.prompt)
            .bind(presentation.primary_color)
            .bind(presentation.secondary_color)
            .bind(presentation.font_family)
            .bind(presentation.voice_profile_id)
            .bind(presentation.framework_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;

        for (index, draft) in slides.into_iter().enumerate() {
            insert_slide(&mut tx, record.id, index as i32 + 1, draft).await?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_presentation(&self, presentation_id: Uuid) -> PortResult<Presentation> {
        let sql = format!("SELECT {PRESENTATION_COLUMNS} FROM presentations WHERE id = $1");
        let record = sqlx::query_as::<_, PresentationRecord>(&sql)
            .bind(presentation_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Presentation", presentation_id))?;
        Ok(record.to_domain())
    }

    async fn list_presentations(&self) -> PortResult<Vec<Presentation>> {
        let sql = format!("SELECT {PRESENTATION_COLUMNS} FROM presentations ORDER BY updated_at DESC");
        let records = sqlx::query_as::<_, PresentationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_presentation_settings(
        &self,
        presentation_id: Uuid,
        settings: PresentationSettings,
    ) -> PortResult<Presentation> {
        let sql = format!(
            "UPDATE presentations SET title = $1, description = $2, primary_color = $3, \
             secondary_color = $4, font_family = $5, updated_at = NOW() \
             WHERE id = $6 RETURNING {PRESENTATION_COLUMNS}"
        );
        let record = sqlx::query_as::<_, PresentationRecord>(&sql)
            .bind(settings.title)
            .bind(settings.description)
            .bind(settings.primary_color)
            .bind(settings.secondary_color)
            .bind(settings.font_family)
            .bind(presentation_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Presentation", presentation_id))?;
        Ok(record.to_domain())
    }

    async fn delete_presentation(&self, presentation_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM presentations WHERE id = $1")
            .bind(presentation_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Presentation {} not found",
                presentation_id
            )));
        }
        Ok(())
    }

    async fn list_slides(&self, presentation_id: Uuid) -> PortResult<Vec<Slide>> {
        let sql = format!(
            "SELECT {SLIDE_COLUMNS} FROM slides WHERE presentation_id = $1 ORDER BY slide_order ASC"
        );
        let records = sqlx::query_as::<_, SlideRecord>(&sql)
            .bind(presentation_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_slide(&self, slide_id: Uuid) -> PortResult<Slide> {
        let sql = format!("SELECT {SLIDE_COLUMNS} FROM slides WHERE id = $1");
        sqlx::query_as::<_, SlideRecord>(&sql)
            .bind(slide_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Slide", slide_id))?
            .to_domain()
    }

    async fn insert_slide_at(
        &self,
        presentation_id: Uuid,
        position: i32,
        draft: SlideDraft,
    ) -> PortResult<Slide> {
        if position < 1 {
            return Err(PortError::Invalid(format!(
                "Slide position must be at least 1, got {}",
                position
            )));
        }
        let mut tx = self.begin().await?;

        sqlx::query("SELECT id FROM presentations WHERE id = $1")
            .bind(presentation_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(not_found("Presentation", presentation_id))?;

        // Highest order first, so no two rows ever share an order mid-shift.
        let followers: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM slides WHERE presentation_id = $1 AND slide_order >= $2 \
             ORDER BY slide_order DESC",
        )
        .bind(presentation_id)
        .bind(position)
        .fetch_all(&mut *tx)
        .await
        .map_err(unexpected)?;

        for (slide_id,) in followers {
            sqlx::query(
                "UPDATE slides SET slide_order = slide_order + 1, updated_at = NOW() WHERE id = $1",
            )
            .bind(slide_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        let slide = insert_slide(&mut tx, presentation_id, position, draft).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(slide)
    }

    async fn delete_slide(&self, slide_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM slides WHERE id = $1")
            .bind(slide_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Slide {} not found", slide_id)));
        }
        Ok(())
    }

    async fn reorder_slides(&self, presentation_id: Uuid, orders: Vec<SlideOrder>) -> PortResult<()> {
        let mut tx = self.begin().await?;
        for entry in orders {
            let result = sqlx::query(
                "UPDATE slides SET slide_order = $1, updated_at = NOW() \
                 WHERE id = $2 AND presentation_id = $3",
            )
            .bind(entry.order)
            .bind(entry.slide_id)
            .bind(presentation_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
            if result.rows_affected() == 0 {
                return Err(PortError::NotFound(format!(
                    "Slide {} not found in presentation {}",
                    entry.slide_id, presentation_id
                )));
            }
        }
        // The (presentation_id, slide_order) constraint is deferred, so collisions surface here.
        tx.commit().await.map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => PortError::Invalid(format!(
                "Reorder would give two slides of presentation {} the same order",
                presentation_id
            )),
            _ => unexpected(e),
        })?;
        Ok(())
    }

    async fn update_slide(&self, slide_id: Uuid, update: SlideUpdate) -> PortResult<Slide> {
        let draft = update.0;
        let sql = format!(
            "UPDATE slides SET title = $1, content = $2, narration = $3, annotations = $4, \
             slide_type = $5, layout = $6, image_url = $7, background_color = $8, text_color = $9, \
             heading_color = $10, text_align = $11, show_title = $12, show_content = $13, \
             updated_at = NOW() WHERE id = $14 RETURNING {SLIDE_COLUMNS}"
        );
        sqlx::query_as::<_, SlideRecord>(&sql)
            .bind(draft.title)
            .bind(draft.content)
            .bind(draft.narration)
            .bind(draft.annotations)
            .bind(draft.slide_type.as_str())
            .bind(draft.layout.as_str())
            .bind(draft.image_url)
            .bind(draft.background_color)
            .bind(draft.text_color)
            .bind(draft.heading_color)
            .bind(draft.text_align.as_str())
            .bind(draft.show_title)
            .bind(draft.show_content)
            .bind(slide_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Slide", slide_id))?
            .to_domain()
    }

    async fn apply_colors_to_all(
        &self,
        presentation_id: Uuid,
        colors: SlideColors,
    ) -> PortResult<u64> {
        let result = sqlx::query(
            "UPDATE slides SET background_color = $1, text_color = $2, heading_color = $3, \
             updated_at = NOW() WHERE presentation_id = $4",
        )
        .bind(colors.background_color)
        .bind(colors.text_color)
        .bind(colors.heading_color)
        .bind(presentation_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(result.rows_affected())
    }

    async fn create_framework(&self, framework: NewFramework) -> PortResult<Framework> {
        let mut tx = self.begin().await?;
        let record = sqlx::query_as::<_, FrameworkRecord>(
            "INSERT INTO frameworks (id, name, description, is_default) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, description, is_default",
        )
        .bind(Uuid::new_v4())
        .bind(framework.name)
        .bind(framework.description)
        .bind(framework.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        let mut slides = Vec::with_capacity(framework.slides.len());
        for (index, slide) in framework.slides.into_iter().enumerate() {
            let saved = sqlx::query_as::<_, FrameworkSlideRecord>(
                "INSERT INTO framework_slides (id, framework_id, title, instructions, slide_type, layout, slide_order) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id, framework_id, title, instructions, slide_type, layout, slide_order",
            )
            .bind(Uuid::new_v4())
            .bind(record.id)
            .bind(slide.title)
            .bind(slide.instructions)
            .bind(slide.slide_type.as_str())
            .bind(slide.layout.as_str())
            .bind(index as i32 + 1)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;
            slides.push(saved.to_domain()?);
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(Framework {
            id: record.id,
            name: record.name,
            description: record.description,
            is_default: record.is_default,
            slides,
        })
    }

    async fn get_framework(&self, framework_id: Uuid) -> PortResult<Framework> {
        let record = sqlx::query_as::<_, FrameworkRecord>(
            "SELECT id, name, description, is_default FROM frameworks WHERE id = $1",
        )
        .bind(framework_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("Framework", framework_id))?;

        let mut slides = load_framework_slides(&self.pool, &[record.id]).await?;
        Ok(Framework {
            slides: slides.remove(&record.id).unwrap_or_default(),
            id: record.id,
            name: record.name,
            description: record.description,
            is_default: record.is_default,
        })
    }

    async fn list_frameworks(&self) -> PortResult<Vec<Framework>> {
        let records = sqlx::query_as::<_, FrameworkRecord>(
            "SELECT id, name, description, is_default FROM frameworks ORDER BY is_default DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut slides = load_framework_slides(&self.pool, &ids).await?;
        Ok(records
            .into_iter()
            .map(|record| Framework {
                slides: slides.remove(&record.id).unwrap_or_default(),
                id: record.id,
                name: record.name,
                description: record.description,
                is_default: record.is_default,
            })
            .collect())
    }

    async fn create_voice_profile(&self, profile: VoiceProfile) -> PortResult<VoiceProfile> {
        let sql = format!(
            "INSERT INTO voice_profiles ({VOICE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {VOICE_COLUMNS}"
        );
        let record = sqlx::query_as::<_, VoiceProfileRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(profile.name)
            .bind(profile.is_default)
            .bind(profile.tone)
            .bind(profile.audience)
            .bind(profile.objective)
            .bind(profile.brand_voice)
            .bind(profile.content_style)
            .bind(profile.restrictions)
            .bind(profile.other)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_voice_profile(&self, profile_id: Uuid) -> PortResult<VoiceProfile> {
        let sql = format!("SELECT {VOICE_COLUMNS} FROM voice_profiles WHERE id = $1");
        let record = sqlx::query_as::<_, VoiceProfileRecord>(&sql)
            .bind(profile_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Voice profile", profile_id))?;
        Ok(record.to_domain())
    }

    async fn list_voice_profiles(&self) -> PortResult<Vec<VoiceProfile>> {
        let sql = format!(
            "SELECT {VOICE_COLUMNS} FROM voice_profiles ORDER BY is_default DESC, name ASC"
        );
        let records = sqlx::query_as::<_, VoiceProfileRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_idea(&self, title: &str, description: &str) -> PortResult<Idea> {
        let record = sqlx::query_as::<_, IdeaRecord>(
            "INSERT INTO ideas (id, title, description) VALUES ($1, $2, $3) \
             RETURNING id, title, description, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_idea(&self, idea_id: Uuid) -> PortResult<Idea> {
        let record = sqlx::query_as::<_, IdeaRecord>(
            "SELECT id, title, description, created_at FROM ideas WHERE id = $1",
        )
        .bind(idea_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("Idea", idea_id))?;
        Ok(record.to_domain())
    }

    async fn list_ideas(&self) -> PortResult<Vec<Idea>> {
        let records = sqlx::query_as::<_, IdeaRecord>(
            "SELECT id, title, description, created_at FROM ideas ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
