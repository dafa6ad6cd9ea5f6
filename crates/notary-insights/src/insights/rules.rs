use crate::stats::{DocumentStats, RevenueStats, UserActivityStats};
use serde::Serialize;

/// Fewer weekly sign-ups than this is flagged as weak acquisition.
pub const LOW_ACQUISITION_THRESHOLD: u64 = 5;
/// More pending documents than this is flagged as a certifier backlog.
pub const PENDING_BACKLOG_THRESHOLD: u64 = 50;
/// Month-to-date revenue is expected to reach this many weeks of the current week.
pub const PROJECTED_WEEKS_PER_MONTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    LowAcquisition,
    UserGrowth,
    PendingBacklog,
    RevenueBelowProjection,
    RevenueOnTrack,
}

impl InsightKind {
    pub fn title(self) -> &'static str {
        match self {
            InsightKind::LowAcquisition => "Baja captación de usuarios",
            InsightKind::UserGrowth => "Crecimiento de usuarios",
            InsightKind::PendingBacklog => "Documentos pendientes",
            InsightKind::RevenueBelowProjection => "Ingresos por debajo de lo proyectado",
            InsightKind::RevenueOnTrack => "Ingresos en línea",
        }
    }
}

/// Advisory message shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    #[serde(skip)]
    kind: InsightKind,
    title: String,
    description: String,
}

impl Insight {
    fn new(kind: InsightKind, description: String) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            description,
        }
    }

    pub fn kind(&self) -> InsightKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Applies the user, document, and revenue rules in that order.
///
/// Always yields the user and revenue insights; the backlog insight only
/// appears when pending documents exceed [`PENDING_BACKLOG_THRESHOLD`].
pub fn derive_insights(
    users: &UserActivityStats,
    documents: &DocumentStats,
    revenue: &RevenueStats,
) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    insights.push(user_acquisition_insight(users));
    if let Some(backlog) = pending_backlog_insight(documents) {
        insights.push(backlog);
    }
    insights.push(revenue_projection_insight(revenue));

    insights
}

fn user_acquisition_insight(users: &UserActivityStats) -> Insight {
    if users.new_users_this_week < LOW_ACQUISITION_THRESHOLD {
        Insight::new(
            InsightKind::LowAcquisition,
            format!(
                "Se registraron menos de {LOW_ACQUISITION_THRESHOLD} usuarios nuevos esta semana. \
                 Considera campañas de marketing o programas de referidos para aumentar el registro."
            ),
        )
    } else {
        Insight::new(
            InsightKind::UserGrowth,
            format!(
                "Se registraron {} usuarios nuevos esta semana. \
                 Continúa con las acciones de adquisición.",
                users.new_users_this_week
            ),
        )
    }
}

fn pending_backlog_insight(documents: &DocumentStats) -> Option<Insight> {
    let pending = documents.pending();
    if pending <= PENDING_BACKLOG_THRESHOLD {
        return None;
    }

    Some(Insight::new(
        InsightKind::PendingBacklog,
        format!(
            "Existen {pending} documentos pendientes. \
             Revisa la disponibilidad de certificadores y ajusta la carga de trabajo."
        ),
    ))
}

fn revenue_projection_insight(revenue: &RevenueStats) -> Insight {
    if revenue.revenue_this_month < revenue.revenue_this_week * PROJECTED_WEEKS_PER_MONTH {
        Insight::new(
            InsightKind::RevenueBelowProjection,
            "Los ingresos de este mes podrían estar por debajo de las expectativas. \
             Evalúa nuevas estrategias comerciales o revisa la estructura de precios."
                .to_string(),
        )
    } else {
        Insight::new(
            InsightKind::RevenueOnTrack,
            "Los ingresos de este mes se mantienen acorde a lo planificado.".to_string(),
        )
    }
}
