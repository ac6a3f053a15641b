use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::entities::option_fields::OptionField;
use crate::entities::page::{
    NewPageRequest, Page, PageResponse, ReorderPagesRequest, UpdatePageRequest,
};
use crate::entities::template::template_exists;
use crate::errors::AppError;
use crate::infrastructure::storage::images::ImageStorage;
use crate::repositories::element::ElementRepository;
use crate::repositories::image::ImageRepository;
use crate::repositories::page::PageRepository;

pub struct PageHandler<P, E, I>
where
    P: PageRepository,
    E: ElementRepository,
    I: ImageRepository,
{
    pub page_repo: Arc<P>,
    pub element_repo: Arc<E>,
    pub image_repo: Arc<I>,
    pub storage: ImageStorage,
}

impl<P, E, I> PageHandler<P, E, I>
where
    P: PageRepository,
    E: ElementRepository,
    I: ImageRepository,
{
    pub fn new(
        page_repo: Arc<P>,
        element_repo: Arc<E>,
        image_repo: Arc<I>,
        storage: ImageStorage,
    ) -> Self {
        PageHandler { page_repo, element_repo, image_repo, storage }
    }

    /// Fetches the page and checks it belongs to the caller's project.
    /// A page under someone else's project reads as absent.
    pub async fn owned_page(&self, project_id: &Uuid, page_id: &Uuid) -> Result<Page, AppError> {
        let page = self
            .page_repo
            .get_page(page_id)
            .await?
            .ok_or(AppError::PageNotFound)?;

        if page.project_id != *project_id {
            return Err(AppError::PageNotFound);
        }

        Ok(page)
    }

    pub async fn list_pages(&self, project_id: &Uuid) -> Result<Vec<PageResponse>, AppError> {
        let pages = self.page_repo.list_pages(project_id).await?;
        Ok(pages.into_iter().map(PageResponse::from).collect())
    }

    pub async fn create_page(
        &self,
        project_id: &Uuid,
        request: NewPageRequest,
    ) -> Result<PageResponse, AppError> {
        request.validate()?;

        if !template_exists(&request.template_id) {
            return Err(AppError::field("templateId", "unknown template"));
        }

        let order_index = self.page_repo.next_order_index(project_id).await?;
        let insert = request.prepare_for_insert(*project_id, order_index);
        let page = self.page_repo.create_page(&insert).await?;

        info!(page_id = %page.id, order = page.order_index, "page created");
        Ok(page.into())
    }

    pub async fn update_page(
        &self,
        project_id: &Uuid,
        page_id: &Uuid,
        request: UpdatePageRequest,
    ) -> Result<PageResponse, AppError> {
        self.owned_page(project_id, page_id).await?;

        if request.is_noop() {
            return Err(AppError::field("body", "no updatable fields provided"));
        }
        match &request.template_id {
            OptionField::SetToNull => {
                return Err(AppError::field("templateId", "cannot be null"));
            }
            OptionField::SetToValue(template_id) if !template_exists(template_id) => {
                return Err(AppError::field("templateId", "unknown template"));
            }
            _ => {}
        }

        let page = self.page_repo.update_page(page_id, &request).await?;
        Ok(page.into())
    }

    /// Deletes the page, then sweeps any images its elements referenced
    /// and deletes the ones nothing references any more.
    pub async fn delete_page(&self, project_id: &Uuid, page_id: &Uuid) -> Result<(), AppError> {
        self.owned_page(project_id, page_id).await?;

        let image_ids = self.page_repo.delete_page(page_id).await?;

        for image_id in &image_ids {
            if let Some(path) = self.image_repo.delete_image_if_unreferenced(image_id).await? {
                self.storage.remove(&path).await?;
            }
        }

        info!(page_id = %page_id, "page deleted");
        Ok(())
    }

    /// The request must list every page of the project exactly once; the
    /// new order is the list order.
    pub async fn reorder_pages(
        &self,
        project_id: &Uuid,
        request: ReorderPagesRequest,
    ) -> Result<Vec<PageResponse>, AppError> {
        let existing: HashSet<Uuid> = self.page_repo.page_ids(project_id).await?.into_iter().collect();
        let requested: HashSet<Uuid> = request.page_ids.iter().copied().collect();

        if requested.len() != request.page_ids.len() {
            return Err(AppError::field("pageIds", "contains duplicate page ids"));
        }
        if requested != existing {
            return Err(AppError::field(
                "pageIds",
                "must list every page of the project exactly once",
            ));
        }

        self.page_repo.reorder_pages(project_id, &request.page_ids).await?;
        self.list_pages(project_id).await
    }
}
