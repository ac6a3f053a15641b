use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::element::{
    ElementResponse, ElementType, NewElementRequest, UpdateElementRequest,
};
use crate::entities::image::image_file_url;
use crate::entities::option_fields::OptionField;
use crate::errors::AppError;

/// Offset applied to a pasted element so the copy does not land exactly
/// on top of its source.
pub const PASTE_OFFSET_PX: f64 = 24.0;

/// The slice of the backend API the element store talks to. Abstracted
/// so the store's rollback behavior is testable against a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ElementApi: Send + Sync {
    async fn list_elements(&self, page_id: &Uuid) -> Result<Vec<ElementResponse>, AppError>;
    async fn create_element(
        &self,
        page_id: &Uuid,
        request: NewElementRequest,
    ) -> Result<ElementResponse, AppError>;
    async fn update_element(
        &self,
        element_id: &Uuid,
        request: UpdateElementRequest,
    ) -> Result<ElementResponse, AppError>;
    async fn delete_element(&self, element_id: &Uuid) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// A failed operation, kept so the user can retry it as-is.
#[derive(Debug, Clone)]
pub enum RetryOp {
    Create {
        page_id: Uuid,
        request: NewElementRequest,
    },
    Update {
        element_id: Uuid,
        request: UpdateElementRequest,
    },
    Delete {
        element_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub retry: Option<RetryOp>,
}

/// Client-side cache of one page's elements.
///
/// Updates and deletes are optimistic: the local copy changes first and
/// is rolled back if the server refuses. Creates are pessimistic, the
/// element only appears once the server has assigned it an id.
pub struct ElementStore<A: ElementApi> {
    api: A,
    page_id: Option<Uuid>,
    elements: Vec<ElementResponse>,
    state: LoadState,
    selected: Option<Uuid>,
    clipboard: Option<ElementResponse>,
    notifications: Vec<Notification>,
}

impl<A: ElementApi> ElementStore<A> {
    pub fn new(api: A) -> Self {
        ElementStore {
            api,
            page_id: None,
            elements: Vec::new(),
            state: LoadState::default(),
            selected: None,
            clipboard: None,
            notifications: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[ElementResponse] {
        &self.elements
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn page_id(&self) -> Option<Uuid> {
        self.page_id
    }

    /// Selection is purely local; it survives failed server calls and is
    /// dropped when the selected element disappears.
    pub fn select(&mut self, element_id: Option<Uuid>) {
        self.selected = element_id.filter(|id| self.elements.iter().any(|e| e.id == *id));
    }

    pub fn selected_element(&self) -> Option<&ElementResponse> {
        let id = self.selected?;
        self.elements.iter().find(|e| e.id == id)
    }

    /// Copies the selected element to the clipboard. Returns false when
    /// nothing is selected.
    pub fn copy_selected(&mut self) -> bool {
        match self.selected_element().cloned() {
            Some(element) => {
                self.clipboard = Some(element);
                true
            }
            None => false,
        }
    }

    pub fn clipboard(&self) -> Option<&ElementResponse> {
        self.clipboard.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub async fn load(&mut self, page_id: Uuid) {
        self.state = LoadState::Loading;
        self.page_id = Some(page_id);

        match self.api.list_elements(&page_id).await {
            Ok(elements) => {
                self.elements = elements;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                self.elements.clear();
                self.state = LoadState::Failed;
                self.notify(format!("Failed to load elements: {e}"), None);
            }
        }
        self.selected = None;
    }

    pub async fn create(&mut self, page_id: Uuid, request: NewElementRequest) -> bool {
        match self.api.create_element(&page_id, request.clone()).await {
            Ok(element) => {
                self.elements.push(element);
                true
            }
            Err(e) => {
                self.notify(
                    format!("Failed to create element: {e}"),
                    Some(RetryOp::Create { page_id, request }),
                );
                false
            }
        }
    }

    pub async fn update(&mut self, element_id: Uuid, request: UpdateElementRequest) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id == element_id) else {
            self.notify("Element no longer exists".to_string(), None);
            return false;
        };

        let snapshot = self.elements[index].clone();
        self.elements[index] = apply_update(&snapshot, &request);

        match self.api.update_element(&element_id, request.clone()).await {
            Ok(element) => {
                self.elements[index] = element;
                true
            }
            Err(e) => {
                self.elements[index] = snapshot;
                self.notify(
                    format!("Failed to update element: {e}"),
                    Some(RetryOp::Update { element_id, request }),
                );
                false
            }
        }
    }

    pub async fn delete(&mut self, element_id: Uuid) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id == element_id) else {
            self.notify("Element no longer exists".to_string(), None);
            return false;
        };

        let removed = self.elements.remove(index);

        match self.api.delete_element(&element_id).await {
            Ok(()) => {
                if self.selected == Some(element_id) {
                    self.selected = None;
                }
                true
            }
            Err(e) => {
                self.elements.insert(index, removed);
                self.notify(
                    format!("Failed to delete element: {e}"),
                    Some(RetryOp::Delete { element_id }),
                );
                false
            }
        }
    }

    /// Pastes the clipboard element onto a page, nudged down-right so the
    /// copy is visibly distinct. Goes through the create path, so the
    /// paste only lands once the server confirms it. Returns false when
    /// the clipboard is empty.
    pub async fn paste(&mut self, page_id: Uuid) -> bool {
        let Some(clipboard) = self.clipboard.clone() else {
            return false;
        };
        self.create(page_id, paste_request(&clipboard)).await
    }

    pub async fn retry(&mut self, op: RetryOp) -> bool {
        match op {
            RetryOp::Create { page_id, request } => self.create(page_id, request).await,
            RetryOp::Update { element_id, request } => self.update(element_id, request).await,
            RetryOp::Delete { element_id } => self.delete(element_id).await,
        }
    }

    fn notify(&mut self, message: String, retry: Option<RetryOp>) {
        self.notifications.push(Notification { message, retry });
    }
}

/// Local projection of a PATCH body onto an element, used for the
/// optimistic copy shown while the request is in flight.
fn apply_update(element: &ElementResponse, request: &UpdateElementRequest) -> ElementResponse {
    let mut updated = element.clone();

    if let OptionField::SetToValue(position) = &request.position {
        updated.position = *position;
    }
    match &request.content {
        OptionField::SetToValue(content) => updated.content = Some(content.clone()),
        OptionField::SetToNull => updated.content = None,
        OptionField::Unchanged => {}
    }
    match &request.image_id {
        OptionField::SetToValue(image_id) => {
            updated.image_id = Some(*image_id);
            updated.image_url = Some(image_file_url(image_id));
        }
        OptionField::SetToNull => {
            updated.image_id = None;
            updated.image_url = None;
        }
        OptionField::Unchanged => {}
    }
    match &request.crop_data {
        OptionField::SetToValue(crop) => updated.crop_data = Some(*crop),
        OptionField::SetToNull => updated.crop_data = None,
        OptionField::Unchanged => {}
    }
    match &request.animation_prompt {
        OptionField::SetToValue(prompt) => updated.animation_prompt = Some(prompt.clone()),
        OptionField::SetToNull => updated.animation_prompt = None,
        OptionField::Unchanged => {}
    }
    match &request.video_url {
        OptionField::SetToValue(url) => updated.video_url = Some(url.clone()),
        OptionField::SetToNull => updated.video_url = None,
        OptionField::Unchanged => {}
    }
    if let OptionField::SetToValue(status) = &request.video_status {
        updated.video_status = Some(*status);
    }

    updated
}

fn paste_request(clipboard: &ElementResponse) -> NewElementRequest {
    let mut position = clipboard.position;
    position.x += PASTE_OFFSET_PX;
    position.y += PASTE_OFFSET_PX;

    let is_image = clipboard.element_type == ElementType::Image;

    NewElementRequest {
        element_type: clipboard.element_type,
        position,
        content: if is_image { None } else { clipboard.content.clone() },
        image_id: if is_image { clipboard.image_id } else { None },
        crop_data: if is_image { clipboard.crop_data } else { None },
        animation_prompt: if is_image { clipboard.animation_prompt.clone() } else { None },
        video_url: if is_image { clipboard.video_url.clone() } else { None },
        video_status: if is_image { clipboard.video_status } else { None },
    }
}
