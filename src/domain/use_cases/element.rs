use std::sync::Arc;
use std::str::FromStr;

use tracing::info;
use uuid::Uuid;

use crate::constants::MAX_IMAGE_ELEMENTS_PER_PAGE;
use crate::entities::element::{
    Element, ElementInsert, ElementResponse, ElementRow, ElementType, NewElementRequest,
    UpdateElementRequest,
};
use crate::entities::option_fields::OptionField;
use crate::errors::AppError;
use crate::infrastructure::storage::images::ImageStorage;
use crate::repositories::element::ElementRepository;
use crate::repositories::image::ImageRepository;
use crate::repositories::page::PageRepository;

pub struct ElementHandler<E, P, I>
where
    E: ElementRepository,
    P: PageRepository,
    I: ImageRepository,
{
    pub element_repo: Arc<E>,
    pub page_repo: Arc<P>,
    pub image_repo: Arc<I>,
    pub storage: ImageStorage,
}

impl<E, P, I> ElementHandler<E, P, I>
where
    E: ElementRepository,
    P: PageRepository,
    I: ImageRepository,
{
    pub fn new(
        element_repo: Arc<E>,
        page_repo: Arc<P>,
        image_repo: Arc<I>,
        storage: ImageStorage,
    ) -> Self {
        ElementHandler { element_repo, page_repo, image_repo, storage }
    }

    async fn owned_page_id(&self, project_id: &Uuid, page_id: &Uuid) -> Result<(), AppError> {
        let page = self
            .page_repo
            .get_page(page_id)
            .await?
            .ok_or(AppError::PageNotFound)?;

        if page.project_id != *project_id {
            return Err(AppError::PageNotFound);
        }

        Ok(())
    }

    /// Fetches the element and checks the page it sits on belongs to the
    /// caller's project.
    async fn owned_element(
        &self,
        project_id: &Uuid,
        element_id: &Uuid,
    ) -> Result<ElementRow, AppError> {
        let row = self
            .element_repo
            .get_element(element_id)
            .await?
            .ok_or(AppError::ElementNotFound)?;

        let page = self
            .page_repo
            .get_page(&row.page_id)
            .await?
            .ok_or(AppError::ElementNotFound)?;

        if page.project_id != *project_id {
            return Err(AppError::ElementNotFound);
        }

        Ok(row)
    }

    async fn verify_image_ownership(
        &self,
        project_id: &Uuid,
        image_id: &Uuid,
    ) -> Result<(), AppError> {
        let image = self
            .image_repo
            .get_image(image_id)
            .await?
            .ok_or(AppError::ImageNotFound)?;

        if image.project_id != *project_id {
            return Err(AppError::ImageNotFound);
        }

        Ok(())
    }

    pub async fn list_elements(
        &self,
        project_id: &Uuid,
        page_id: &Uuid,
    ) -> Result<Vec<ElementResponse>, AppError> {
        self.owned_page_id(project_id, page_id).await?;

        let rows = self.element_repo.list_elements(page_id).await?;
        rows.into_iter()
            .map(|row| Element::try_from(row).map(ElementResponse::from))
            .collect()
    }

    pub async fn create_element(
        &self,
        project_id: &Uuid,
        page_id: &Uuid,
        request: NewElementRequest,
    ) -> Result<ElementResponse, AppError> {
        self.owned_page_id(project_id, page_id).await?;

        let (position, body) = request.into_parts()?;

        if body.element_type().is_image() {
            let count = self.element_repo.count_image_elements(page_id).await?;
            if count >= MAX_IMAGE_ELEMENTS_PER_PAGE {
                return Err(AppError::field(
                    "type",
                    &format!("a page can hold at most {MAX_IMAGE_ELEMENTS_PER_PAGE} image elements"),
                ));
            }
        }
        if let crate::entities::element::ElementBody::Image { image_id: Some(image_id), .. } = &body
        {
            self.verify_image_ownership(project_id, image_id).await?;
        }

        let insert = ElementInsert::from_parts(*page_id, position, body);
        let row = self.element_repo.insert_element(&insert).await?;

        info!(element_id = %row.id, element_type = %row.element_type, "element created");
        Element::try_from(row).map(ElementResponse::from)
    }

    pub async fn update_element(
        &self,
        project_id: &Uuid,
        element_id: &Uuid,
        request: UpdateElementRequest,
    ) -> Result<ElementResponse, AppError> {
        let row = self.owned_element(project_id, element_id).await?;

        if request.is_noop() {
            return Err(AppError::field("body", "no updatable fields provided"));
        }

        let element_type =
            ElementType::from_str(&row.element_type).map_err(AppError::InternalError)?;
        request.validate_for(element_type)?;

        if let OptionField::SetToValue(image_id) = &request.image_id {
            self.verify_image_ownership(project_id, image_id).await?;
        }

        let previous_image = row.image_id;
        let updated = self.element_repo.update_element(element_id, &request).await?;

        // Replacing or clearing the image reference can orphan the old
        // image; sweep it the same way element deletion does.
        if let Some(old_id) = previous_image {
            if updated.image_id != Some(old_id) {
                self.sweep_image(&old_id).await?;
            }
        }

        Element::try_from(updated).map(ElementResponse::from)
    }

    pub async fn delete_element(
        &self,
        project_id: &Uuid,
        element_id: &Uuid,
    ) -> Result<(), AppError> {
        let row = self.owned_element(project_id, element_id).await?;

        self.element_repo.delete_element(element_id).await?;

        if let Some(image_id) = row.image_id {
            self.sweep_image(&image_id).await?;
        }

        info!(element_id = %element_id, "element deleted");
        Ok(())
    }

    async fn sweep_image(&self, image_id: &Uuid) -> Result<(), AppError> {
        if let Some(path) = self.image_repo.delete_image_if_unreferenced(image_id).await? {
            self.storage.remove(&path).await?;
        }
        Ok(())
    }
}
