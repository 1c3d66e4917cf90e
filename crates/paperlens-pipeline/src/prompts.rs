//! Request builders for chunk-scoped answering and the merge pass.

use paperlens_document::Chunk;
use paperlens_llm::{ChatRequest, Message};

/// Separator between partial answers in the merge request body.
pub const PARTIAL_SEPARATOR: &str = "\n\n---\n\n";

const CHUNK_SYSTEM: &str = "You are an academic literature analyst. Answer the question \
     using only the provided document excerpt. If the excerpt does not contain the \
     relevant information, state that explicitly.";

const MERGE_SYSTEM: &str = "You are an academic literature analyst. You are given partial \
     answers produced from consecutive parts of one document. Merge them into a single \
     coherent answer grounded in the document, and state explicitly when information is \
     absent from the document.";

pub fn chunk_request(model: &str, chunk: &Chunk, question: &str, temperature: f32) -> ChatRequest {
    let user = format!(
        "Document excerpt (part {index} of {total}):\n\n{text}\n\nQuestion: {question}",
        index = chunk.index,
        total = chunk.total,
        text = chunk.text,
    );
    ChatRequest::new(
        model,
        vec![Message::system(CHUNK_SYSTEM), Message::user(user)],
        temperature,
    )
}

pub fn merge_request(
    model: &str,
    question: &str,
    partials: &[String],
    temperature: f32,
) -> ChatRequest {
    let user = format!(
        "Question: {question}\n\nPartial answers from consecutive parts of the document:\n\n{}",
        partials.join(PARTIAL_SEPARATOR),
    );
    ChatRequest::new(
        model,
        vec![Message::system(MERGE_SYSTEM), Message::user(user)],
        temperature,
    )
}
