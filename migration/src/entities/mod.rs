pub mod about_section;
pub mod experience;
pub mod feedback;
pub mod hero_section;
pub mod skill;
pub mod skill_year;
pub mod visitor_count;
pub mod wakatime_stat;

pub use about_section::Entity as AboutSectionEntity;
pub use experience::Entity as ExperienceEntity;
pub use feedback::Entity as FeedbackEntity;
pub use hero_section::Entity as HeroSectionEntity;
pub use skill::Entity as SkillEntity;
pub use skill_year::Entity as SkillYearEntity;
pub use visitor_count::Entity as VisitorCountEntity;
pub use wakatime_stat::Entity as WakatimeStatEntity;
