/// Generates the uniform read, update and delete surface of a client.
///
/// The client struct must carry `inner: ResourceClient<$entity>`,
/// `cleanup` (a `DependentCleanup<$entity>`) and `settings: OperationSettings`.
#[macro_export]
macro_rules! impl_crud_methods {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> $crate::outcome::Outcome<$entity> {
                    tracing::debug!("Sending request");
                    $crate::outcome::Outcome::from_result(
                        $crate::lifecycle::load_entity(&self.inner, id).await,
                    )
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $entity_name_snake s>](&self) -> $crate::outcome::Outcome<Vec<$entity>> {
                    tracing::debug!("Sending request");
                    $crate::outcome::Outcome::from_result(
                        self.inner
                            .list($crate::actor_framework::ListFilter::All)
                            .await
                            .map_err($crate::error::OperationError::from),
                    )
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_active_ $entity_name_snake s>](&self) -> $crate::outcome::Outcome<Vec<$entity>> {
                    tracing::debug!("Sending request");
                    $crate::outcome::Outcome::from_result(
                        self.inner
                            .list($crate::actor_framework::ListFilter::Active)
                            .await
                            .map_err($crate::error::OperationError::from),
                    )
                }

                #[tracing::instrument(skip(self, patch))]
                pub async fn [<update_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                    patch: <$entity as $crate::actor_framework::Entity>::Patch,
                ) -> $crate::outcome::Outcome<()> {
                    tracing::debug!("Sending request");
                    match $crate::lifecycle::update_entity(&self.inner, &self.settings.engine, id, &patch).await {
                        Ok(_) => $crate::outcome::Outcome::success_empty(),
                        Err(e) => e.into(),
                    }
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> $crate::outcome::Outcome<$crate::lifecycle::DeleteSummary<$entity>> {
                    tracing::debug!("Sending request");
                    $crate::outcome::Outcome::from_result(
                        $crate::lifecycle::soft_delete(&self.inner, &self.cleanup, self.settings.delete_policy, id).await,
                    )
                }
            }
        }
    };
}
