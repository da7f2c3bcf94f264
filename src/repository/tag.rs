use diesel::prelude::*;

use crate::domain::tag::Tag as DomainTag;
use crate::models::tag::Tag as DbTag;
use crate::repository::{
    DieselRepository, OperationContext, RepositoryError, RepositoryResult, TagReader,
};

impl TagReader for DieselRepository {
    fn list_tags(&self) -> RepositoryResult<Vec<DomainTag>> {
        use crate::schema::tags;

        let context = OperationContext::new("list_tags");
        let mut conn = self.conn(context)?;

        let db_tags = tags::table
            .order(tags::name.asc())
            .load::<DbTag>(&mut conn)
            .map_err(|err| RepositoryError::from_diesel(context, err))?;

        Ok(db_tags.into_iter().map(DomainTag::from).collect())
    }
}
