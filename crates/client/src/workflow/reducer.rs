use domain::ImageInput;

use super::intent::FormIntent;
use super::state::{BlogDraft, FormState};
use crate::mvi::Reducer;

pub struct FormReducer;

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: FormState, intent: FormIntent) -> FormState {
        match intent {
            FormIntent::AddNew => match state {
                // 已在新建中，保留草稿
                FormState::Creating { draft } => FormState::Creating { draft },
                _ => FormState::Creating {
                    draft: BlogDraft::default(),
                },
            },
            FormIntent::Edit(blog) => FormState::Editing {
                draft: BlogDraft::from_blog(&blog),
                stored_image: blog.image,
                blog_id: blog.id,
            },
            FormIntent::SetTitle(title) => with_draft(state, |d| d.title = title),
            FormIntent::SetBody(body) => with_draft(state, |d| d.body = body),
            FormIntent::AttachImage(upload) => {
                with_draft(state, |d| d.image = Some(ImageInput::Upload(upload)))
            }
            // 编辑时服务端不会删除已存的图片，清除只是放弃新选的文件
            FormIntent::ClearImage => match state {
                FormState::Editing {
                    blog_id,
                    mut draft,
                    stored_image,
                } => {
                    draft.image = stored_image.clone().map(ImageInput::Keep);
                    FormState::Editing {
                        blog_id,
                        draft,
                        stored_image,
                    }
                }
                other => with_draft(other, |d| d.image = None),
            },
            FormIntent::Cancel | FormIntent::Submitted => FormState::Closed,
        }
    }
}

fn with_draft(mut state: FormState, edit: impl FnOnce(&mut BlogDraft)) -> FormState {
    if let Some(draft) = state.draft_mut() {
        edit(draft);
    }
    state
}
