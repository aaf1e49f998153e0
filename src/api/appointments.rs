use reqwest::Method;

use super::{ApiClient, Result};
use crate::core::appointment::{
    Appointment, AppointmentPayload, CopyDayRequest, CopyRangeRequest, CopyReply, Reschedule,
};

impl ApiClient {
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        self.get_json("/appointments").await
    }

    pub async fn create_appointment(&self, payload: &AppointmentPayload) -> Result<()> {
        self.execute(Method::POST, "/appointments", Some(payload)).await
    }

    pub async fn update_appointment(&self, id: i64, payload: &AppointmentPayload) -> Result<()> {
        self.execute(Method::PATCH, &format!("/appointments/{}", id), Some(payload))
            .await
    }

    /// Drag-move or resize.
    pub async fn reschedule_appointment(&self, id: i64, range: &Reschedule) -> Result<()> {
        self.execute(Method::PATCH, &format!("/appointments/{}", id), Some(range))
            .await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<()> {
        self.delete(&format!("/appointments/{}", id)).await
    }

    pub async fn copy_day(&self, request: &CopyDayRequest) -> Result<CopyReply> {
        self.send_json(Method::POST, "/appointments/copy", request).await
    }

    pub async fn copy_range(&self, request: &CopyRangeRequest) -> Result<CopyReply> {
        self.send_json(Method::POST, "/appointments/copy_range", request)
            .await
    }
}
